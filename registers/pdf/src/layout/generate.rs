// Licensed under the Apache-2.0 license

//! Section generation.
//!
//! This module contains the `Generator` that walks address maps and
//! register files and collects their sections in reading order.

use super::{address_layout, Slot};
use crate::access::{get_field_access, get_mem_access, get_reg_access, is_field_reserved};
use crate::config::NameCase;
use crate::output::{
    BlockKind, GeneratedBlock, GeneratedDocument, GeneratedField, GeneratedMemory,
    GeneratedRegister, RegListRow, Section,
};
use crate::util::{anchor_name, array_suffix, format_address, format_reset, inst_name};
use registers_model::{
    walk_children, AddrMapNode, ArrayInfo, MemNode, Node, NodeVisitor, RegFileNode, RegNode,
};

/// Address width used when no map sets `address_width_p`.
pub const DEFAULT_ADDRESS_WIDTH: u32 = 32;
/// Map name used when no map sets `map_name_p`.
pub const DEFAULT_MAP_NAME: &str = "reg_map";

/// `map_name_p` of `map` in uppercase, if set.
pub fn map_name(map: &AddrMapNode) -> Option<String> {
    map.map_name_p
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(str::to_uppercase)
}

/// UVM endianness constant of `map`, if it sets one.
pub fn endianness(map: &AddrMapNode) -> Option<&'static str> {
    if map.bigendian {
        Some("UVM_BIG_ENDIAN")
    } else if map.littleendian {
        Some("UVM_LITTLE_ENDIAN")
    } else {
        None
    }
}

/// Expression giving the offset of an array element.
///
/// For `[A][B] @ X += Y` this is `'hX + i0*'h(B*Y) + i1*'hY`.
pub fn array_offset_expr(offset: u64, array: &ArrayInfo) -> String {
    let mut s = format!("'h{offset:x}");
    for i in 0..array.dimensions.len() {
        let m: u64 = array.stride * array.dimensions[i + 1..].iter().product::<u64>();
        s += &format!(" + i{i}*'h{m:x}");
    }
    s
}

fn bits(msb: u32, lsb: u32) -> String {
    if msb == lsb {
        format!("[{msb}]")
    } else {
        format!("[{msb}:{lsb}]")
    }
}

fn reserved_bits(msb: u32, lsb: u32) -> GeneratedField {
    GeneratedField {
        bits: bits(msb, lsb),
        identifier: "-".into(),
        access: "-".into(),
        reset: "-".into(),
        name: "Reserved".into(),
        description: None,
        reserved: true,
    }
}

/// Field table rows of `reg`, MSB first, with a reserved row for every
/// range of bits no field covers.
pub fn field_rows(reg: &RegNode, case: NameCase) -> Vec<GeneratedField> {
    let mut rows = vec![];
    // One past the highest bit not yet listed
    let mut top = reg.regwidth;
    for field in reg.fields_msb_first() {
        if field.msb + 1 < top {
            rows.push(reserved_bits(top - 1, field.msb + 1));
        }
        rows.push(GeneratedField {
            bits: bits(field.msb, field.lsb),
            identifier: inst_name(&field.inst_name, case),
            access: get_field_access(field).to_string(),
            reset: field
                .reset
                .map(|r| format_reset(r, field.width()))
                .unwrap_or_else(|| "-".to_string()),
            name: field.display_name().to_string(),
            description: field.desc.clone(),
            reserved: is_field_reserved(field),
        });
        top = top.min(field.lsb);
    }
    if top > 0 {
        rows.push(reserved_bits(top - 1, 0));
    }
    rows
}

/// Largest register access width or memory width below a block.
#[derive(Default)]
struct BusWidth(u32);

impl NodeVisitor for BusWidth {
    fn enter(&mut self, node: &Node, _depth: usize) {
        let width = match node {
            Node::Reg(reg) => reg.accesswidth(),
            Node::Mem(mem) => mem.memwidth,
            _ => return,
        };
        self.0 = self.0.max(width);
    }
}

/// Bus width in bytes of a block holding `children`.
fn bus_width(children: &[Node]) -> u64 {
    let mut visitor = BusWidth::default();
    walk_children(children, 0, &mut visitor);
    u64::from(visitor.0).div_ceil(8)
}

/// Properties inherited from the enclosing address map.
#[derive(Clone, Debug)]
struct MapContext {
    address_width: u32,
    map_name: String,
    endianness: &'static str,
}

impl MapContext {
    fn new(map: &AddrMapNode, parent: Option<&MapContext>) -> Self {
        MapContext {
            address_width: map
                .address_width_p
                .or(parent.map(|p| p.address_width))
                .unwrap_or(DEFAULT_ADDRESS_WIDTH),
            map_name: map_name(map)
                .or_else(|| parent.map(|p| p.map_name.clone()))
                .unwrap_or_else(|| DEFAULT_MAP_NAME.to_string()),
            endianness: endianness(map)
                .or(parent.map(|p| p.endianness))
                .unwrap_or("UVM_NO_ENDIAN"),
        }
    }

    fn address(&self, value: u64) -> String {
        format_address(value, self.address_width)
    }
}

/// Where a section sits in the document.
struct Position<'a> {
    number: &'a str,
    depth: usize,
    path: &'a [String],
    /// Absolute address of the node.
    address: u64,
    /// Offset from the enclosing block.
    offset: u64,
}

/// The group-like parts of an address map or register file.
struct Group<'a> {
    kind: BlockKind,
    inst_name: &'a str,
    name: &'a str,
    desc: Option<&'a str>,
    array: Option<&'a ArrayInfo>,
    size: u64,
    children: &'a [Node],
}

impl<'a> From<&'a AddrMapNode> for Group<'a> {
    fn from(map: &'a AddrMapNode) -> Self {
        Group {
            kind: BlockKind::AddrMap,
            inst_name: &map.inst_name,
            name: map.display_name(),
            desc: map.desc.as_deref(),
            array: map.array.as_ref(),
            size: map.size(),
            children: &map.children,
        }
    }
}

impl<'a> From<&'a RegFileNode> for Group<'a> {
    fn from(regfile: &'a RegFileNode) -> Self {
        Group {
            kind: BlockKind::RegFile,
            inst_name: &regfile.inst_name,
            name: regfile.display_name(),
            desc: regfile.desc.as_deref(),
            array: regfile.array.as_ref(),
            size: regfile.size(),
            children: &regfile.children,
        }
    }
}

pub(super) struct Generator {
    case: NameCase,
    sections: Vec<Section>,
}

impl Generator {
    pub(super) fn new(case: NameCase) -> Self {
        Generator {
            case,
            sections: vec![],
        }
    }

    pub(super) fn finish(self, title: String) -> GeneratedDocument {
        GeneratedDocument {
            title,
            sections: self.sections,
        }
    }

    fn identifier(&self, name: &str, array: Option<&ArrayInfo>) -> String {
        let suffix = array.map(|a| array_suffix(&a.dimensions)).unwrap_or_default();
        inst_name(name, self.case) + &suffix
    }

    /// Generate the sections of a top-level address map numbered `number`.
    pub(super) fn addrmap(&mut self, map: &AddrMapNode, number: &str) {
        let ctx = MapContext::new(map, None);
        let path = vec![map.inst_name.clone()];
        let position = Position {
            number,
            depth: 0,
            path: &path,
            address: map.base_address_p.unwrap_or(map.address_offset),
            offset: map.address_offset,
        };
        self.group(Group::from(map), &position, &ctx);
    }

    fn group(&mut self, group: Group<'_>, pos: &Position<'_>, ctx: &MapContext) {
        log::debug!("section {} {}", pos.number, pos.path.join("."));
        let slots = address_layout(group.children);

        let rows = slots
            .iter()
            .map(|slot| match slot {
                Slot::Reserved { start, end } => RegListRow {
                    offset: format!("{} - {}", ctx.address(*start), ctx.address(*end)),
                    identifier: "-".into(),
                    name: "-".into(),
                    link: None,
                },
                Slot::Node(child) => RegListRow {
                    offset: ctx.address(child.address_offset()),
                    identifier: self.identifier(child.inst_name(), child.array()),
                    name: child.display_name().to_string(),
                    link: Some(child_anchor(pos.path, child)),
                },
            })
            .collect();

        self.sections.push(Section::Block(GeneratedBlock {
            number: pos.number.to_string(),
            depth: pos.depth,
            anchor: anchor_name(pos.path),
            kind: group.kind,
            identifier: self.identifier(group.inst_name, group.array),
            name: group.name.to_string(),
            description: group.desc.map(str::to_string),
            base_address: ctx.address(pos.address),
            size: group.size,
            address_width: ctx.address_width,
            map_name: ctx.map_name.clone(),
            endianness: ctx.endianness.to_string(),
            bus_width: bus_width(group.children),
            offset_expr: group.array.map(|a| array_offset_expr(pos.offset, a)),
            rows,
        }));

        let children = slots.iter().filter_map(|slot| match slot {
            Slot::Node(child) => Some(*child),
            Slot::Reserved { .. } => None,
        });
        for (i, child) in children.enumerate() {
            let number = format!("{}.{}", pos.number, i + 1);
            let mut path = pos.path.to_vec();
            path.push(child.inst_name().to_string());
            let offset = child.address_offset();
            let child_pos = Position {
                number: &number,
                depth: pos.depth + 1,
                path: &path,
                address: pos.address.saturating_add(offset),
                offset,
            };
            match child {
                Node::Reg(reg) => self.register(reg, &child_pos, ctx),
                Node::Mem(mem) => self.memory(mem, &child_pos, ctx),
                Node::RegFile(regfile) => self.group(Group::from(regfile), &child_pos, ctx),
                Node::AddrMap(map) => {
                    let nested = MapContext::new(map, Some(ctx));
                    let map_pos = Position {
                        address: map.base_address_p.unwrap_or(child_pos.address),
                        ..child_pos
                    };
                    self.group(Group::from(map), &map_pos, &nested);
                }
            }
        }
    }

    fn register(&mut self, reg: &RegNode, pos: &Position<'_>, ctx: &MapContext) {
        log::debug!("section {} {}", pos.number, pos.path.join("."));
        self.sections.push(Section::Register(GeneratedRegister {
            number: pos.number.to_string(),
            depth: pos.depth,
            anchor: anchor_name(pos.path),
            identifier: self.identifier(&reg.inst_name, reg.array.as_ref()),
            name: reg.display_name().to_string(),
            description: reg.desc.clone(),
            absolute_address: ctx.address(pos.address),
            base_offset: ctx.address(pos.offset),
            offset_expr: reg.array.as_ref().map(|a| array_offset_expr(pos.offset, a)),
            access: get_reg_access(reg).to_string(),
            reset: format_reset(reg.reset_value(), reg.regwidth),
            size: reg.size(),
            fields: field_rows(reg, self.case),
        }));
    }

    fn memory(&mut self, mem: &MemNode, pos: &Position<'_>, ctx: &MapContext) {
        log::debug!("section {} {}", pos.number, pos.path.join("."));
        self.sections.push(Section::Memory(GeneratedMemory {
            number: pos.number.to_string(),
            depth: pos.depth,
            anchor: anchor_name(pos.path),
            identifier: self.identifier(&mem.inst_name, mem.array.as_ref()),
            name: mem.display_name().to_string(),
            description: mem.desc.clone(),
            absolute_address: ctx.address(pos.address),
            base_offset: ctx.address(pos.offset),
            offset_expr: mem.array.as_ref().map(|a| array_offset_expr(pos.offset, a)),
            entries: mem.mementries,
            width: mem.memwidth,
            access: get_mem_access(mem).to_string(),
            size: mem.total_size(),
        }));
    }
}

fn child_anchor(path: &[String], child: &Node) -> String {
    let mut path = path.to_vec();
    path.push(child.inst_name().to_string());
    anchor_name(&path)
}
