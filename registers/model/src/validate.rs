// Licensed under the Apache-2.0 license

//! Structural checks on an elaborated model.
//!
//! A model that fails validation is treated like a compile error: the exporter
//! refuses to render it.

use crate::types::{AddrMapNode, ArrayInfo, FieldNode, MemNode, Node, RegNode, RootNode};
use std::collections::HashSet;
use thiserror::Error;

/// Widest register the model can describe. Reset values are held in a `u64`.
pub const MAX_REGWIDTH: u32 = 64;

/// A structural problem found in the model. `path` is the dotted instance
/// path of the offending node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{path}: instance name is empty")]
    EmptyName { path: String },
    #[error("{path}: lsb {lsb} is greater than msb {msb}")]
    FieldBitOrder { path: String, lsb: u32, msb: u32 },
    #[error("{path}: field bits [{msb}:{lsb}] exceed register width {regwidth}")]
    FieldOutOfRange {
        path: String,
        lsb: u32,
        msb: u32,
        regwidth: u32,
    },
    #[error("{path}: field overlaps {other}")]
    FieldOverlap { path: String, other: String },
    #[error("{path}: reset value {reset:#x} does not fit in {width} bit(s)")]
    ResetTooWide { path: String, reset: u64, width: u32 },
    #[error("{path}: register width {regwidth} is not a power of two between 8 and 64")]
    BadRegWidth { path: String, regwidth: u32 },
    #[error("{path}: array has a zero dimension")]
    EmptyArray { path: String },
    #[error("{path}: array stride {stride:#x} is smaller than element size {size:#x}")]
    StrideTooSmall { path: String, stride: u64, size: u64 },
    #[error("{path}: memory width must be non-zero")]
    BadMemWidth { path: String },
    #[error("{path}: address or size does not fit in 64 bits")]
    AddressOverflow { path: String },
    #[error("{path}: instance name is used by another sibling")]
    DuplicateName { path: String },
}

impl RootNode {
    /// Check every node of the model, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_unique(self.top.iter().map(|m| m.inst_name.as_str()), "")?;
        for map in &self.top {
            map.validate()?;
        }
        Ok(())
    }
}

impl AddrMapNode {
    /// Check a top-level address map and everything below it.
    pub fn validate(&self) -> Result<(), ModelError> {
        let base = self.base_address_p.unwrap_or(self.address_offset);
        validate_addrmap(self, "", base).map(|_| ())
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn overflow(path: &str) -> ModelError {
    ModelError::AddressOverflow {
        path: path.to_string(),
    }
}

fn check_name(name: &str, path: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::EmptyName {
            path: path.to_string(),
        });
    }
    Ok(())
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>, prefix: &str) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ModelError::DuplicateName {
                path: join(prefix, name),
            });
        }
    }
    Ok(())
}

/// Checks the array of a node whose single element is `size` bytes and
/// returns the bytes the whole node spans.
fn check_array(array: Option<&ArrayInfo>, size: u64, path: &str) -> Result<u64, ModelError> {
    let Some(array) = array else {
        return Ok(size);
    };
    if array.dimensions.is_empty() || array.dimensions.contains(&0) {
        return Err(ModelError::EmptyArray {
            path: path.to_string(),
        });
    }
    if array.stride < size {
        return Err(ModelError::StrideTooSmall {
            path: path.to_string(),
            stride: array.stride,
            size,
        });
    }
    array
        .dimensions
        .iter()
        .try_fold(array.stride, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| overflow(path))
}

/// Validates a map placed at absolute address `base` and returns its total
/// size.
fn validate_addrmap(map: &AddrMapNode, prefix: &str, base: u64) -> Result<u64, ModelError> {
    let path = join(prefix, &map.inst_name);
    check_name(&map.inst_name, &path)?;
    let size = validate_children(&map.children, &path, base)?;
    check_array(map.array.as_ref(), size, &path)
}

/// Validates `children` of a block at absolute address `base` and returns
/// the span of the block.
fn validate_children(children: &[Node], prefix: &str, base: u64) -> Result<u64, ModelError> {
    check_unique(children.iter().map(Node::inst_name), prefix)?;
    let mut span = 0;
    for child in children {
        let path = join(prefix, child.inst_name());
        let offset = child.address_offset();
        let address = base.checked_add(offset).ok_or_else(|| overflow(&path))?;
        let total = match child {
            Node::AddrMap(map) => {
                validate_addrmap(map, prefix, map.base_address_p.unwrap_or(address))?
            }
            Node::RegFile(rf) => {
                check_name(&rf.inst_name, &path)?;
                let size = validate_children(&rf.children, &path, address)?;
                check_array(rf.array.as_ref(), size, &path)?
            }
            Node::Reg(reg) => validate_reg(reg, prefix)?,
            Node::Mem(mem) => validate_mem(mem, prefix)?,
        };
        let end = offset.checked_add(total).ok_or_else(|| overflow(&path))?;
        base.checked_add(end).ok_or_else(|| overflow(&path))?;
        span = span.max(end);
    }
    Ok(span)
}

fn validate_reg(reg: &RegNode, prefix: &str) -> Result<u64, ModelError> {
    let path = join(prefix, &reg.inst_name);
    check_name(&reg.inst_name, &path)?;
    if reg.regwidth < 8 || reg.regwidth > MAX_REGWIDTH || !reg.regwidth.is_power_of_two() {
        return Err(ModelError::BadRegWidth {
            path,
            regwidth: reg.regwidth,
        });
    }
    check_unique(reg.fields.iter().map(|f| f.inst_name.as_str()), &path)?;
    for (i, field) in reg.fields.iter().enumerate() {
        validate_field(field, reg.regwidth, &path)?;
        if let Some(other) = reg.fields[..i].iter().find(|o| overlaps(o, field)) {
            return Err(ModelError::FieldOverlap {
                path: join(&path, &field.inst_name),
                other: other.inst_name.clone(),
            });
        }
    }
    check_array(reg.array.as_ref(), reg.size(), &path)
}

fn overlaps(a: &FieldNode, b: &FieldNode) -> bool {
    a.lsb <= b.msb && b.lsb <= a.msb
}

fn validate_field(field: &FieldNode, regwidth: u32, prefix: &str) -> Result<(), ModelError> {
    let path = join(prefix, &field.inst_name);
    check_name(&field.inst_name, &path)?;
    if field.lsb > field.msb {
        return Err(ModelError::FieldBitOrder {
            path,
            lsb: field.lsb,
            msb: field.msb,
        });
    }
    if field.msb >= regwidth {
        return Err(ModelError::FieldOutOfRange {
            path,
            lsb: field.lsb,
            msb: field.msb,
            regwidth,
        });
    }
    if let Some(reset) = field.reset {
        if reset & !field.mask() != 0 {
            return Err(ModelError::ResetTooWide {
                path,
                reset,
                width: field.width(),
            });
        }
    }
    Ok(())
}

fn validate_mem(mem: &MemNode, prefix: &str) -> Result<u64, ModelError> {
    let path = join(prefix, &mem.inst_name);
    check_name(&mem.inst_name, &path)?;
    if mem.memwidth == 0 {
        return Err(ModelError::BadMemWidth { path });
    }
    let size = mem
        .mementries
        .checked_mul(u64::from(mem.memwidth).div_ceil(8))
        .ok_or_else(|| overflow(&path))?;
    check_array(mem.array.as_ref(), size, &path)
}
