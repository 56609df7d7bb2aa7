// Licensed under the Apache-2.0 license

//! Address-map layout.
//!
//! This module walks the elaborated model and produces the ordered sections
//! of the specification ([`GeneratedDocument`]):
//!
//! - one block section per address map and register file, in pre-order,
//!   with its register list (reserved gaps included),
//! - one register section per register, with its field table (MSB first),
//! - one memory section per memory.
//!
//! The implementation is split across submodules:
//! - `generate`: The traversal that builds the sections

mod generate;

use crate::config::NameCase;
use crate::output::GeneratedDocument;
use registers_model::{AddrMapNode, Node, RootNode};

pub use generate::{array_offset_expr, endianness, field_rows, map_name};

/// A slot of a block's address space.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot<'a> {
    /// Bytes `start..=end` not covered by any child.
    Reserved { start: u64, end: u64 },
    /// A child node.
    Node(&'a Node),
}

/// Orders `children` by address offset and fills the holes between them
/// with [`Slot::Reserved`].
///
/// A hole before the first child is reported too. Array children cover
/// their total size. Overlapping children are kept in offset order.
pub fn address_layout(children: &[Node]) -> Vec<Slot<'_>> {
    let mut sorted: Vec<&Node> = children.iter().collect();
    sorted.sort_by_key(|c| c.address_offset());

    let mut slots = vec![];
    let mut next: u64 = 0;
    for child in sorted {
        let offset = child.address_offset();
        if offset > next {
            slots.push(Slot::Reserved {
                start: next,
                end: offset - 1,
            });
        } else if offset < next {
            log::warn!(
                "{} at offset {offset:#x} overlaps the previous child ending at {next:#x}",
                child.inst_name()
            );
        }
        slots.push(Slot::Node(child));
        next = next.max(offset.saturating_add(child.total_size()));
    }
    slots
}

/// Lays out every top-level address map of `root`.
pub fn layout_root(root: &RootNode, case: NameCase) -> GeneratedDocument {
    let mut generator = generate::Generator::new(case);
    for (i, map) in root.top.iter().enumerate() {
        generator.addrmap(map, &(i + 1).to_string());
    }
    generator.finish(default_title(root.top.first()))
}

/// Lays out a single address map as section 1.
pub fn layout_addrmap(map: &AddrMapNode, case: NameCase) -> GeneratedDocument {
    let mut generator = generate::Generator::new(case);
    generator.addrmap(map, "1");
    generator.finish(default_title(Some(map)))
}

fn default_title(map: Option<&AddrMapNode>) -> String {
    match map {
        Some(map) => format!("{} Registers Specification", map.display_name()),
        None => "Registers Specification".to_string(),
    }
}
