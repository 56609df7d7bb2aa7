// Licensed under the Apache-2.0 license

//! Elaborated SystemRDL register model.
//!
//! This crate holds the already-elaborated register tree consumed by the
//! document exporter: address maps, register files, registers, fields and
//! memories with resolved offsets, widths and access properties.
//!
//! ## Module Organization
//!
//! - [`types`]: Node types and property enums
//! - [`load`]: Reading serialized models (JSON, Hjson, TOML)
//! - [`validate`]: Structural checks ([`ModelError`])
//! - [`walk`]: Pre-order traversal ([`NodeVisitor`])

pub mod load;
pub mod types;
pub mod validate;
pub mod walk;

pub use load::ModelFormat;
pub use types::{
    AccessType, AddrMapNode, ArrayInfo, FieldNode, MemNode, Node, OnReadType, OnWriteType,
    RegFileNode, RegNode, RootNode,
};
pub use validate::ModelError;
pub use walk::{walk, walk_children, NodeVisitor};
