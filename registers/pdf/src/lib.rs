// Licensed under the Apache-2.0 license

//! SystemRDL register specification exporter.
//!
//! This crate renders an elaborated register model (see [`registers_model`])
//! as a PDF register specification: a cover page, a table of contents with
//! page numbers, one section per address map and register file with its
//! register list, and one section per register with its field table.
//!
//! ## Usage
//!
//! ```no_run
//! use registers_model::RootNode;
//! use registers_pdf::{ExportOptions, PdfExporter};
//! use std::path::Path;
//!
//! let root = RootNode::from_path(Path::new("soc.hjson")).unwrap();
//! PdfExporter::new(ExportOptions::default())
//!     .export(&root, Path::new("soc.pdf"))
//!     .unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`util`]: Address, reset value and name formatting
//! - [`access`]: UVM access strings
//! - [`config`]: Exporter settings and page template configuration
//! - [`layout`]: Model traversal, reserved gaps and section numbering
//! - [`output`]: Laid-out sections and their conversion into a [`Document`]
//! - [`document`], [`style`], [`fonts`], [`markup`]: The flowable document model
//! - [`pdf`]: Page layout and PDF serialization
//! - [`pages`]: Cover page and footer templates ([`PageTemplate`])
//! - [`exporter`]: The [`PdfExporter`] entry point

pub mod access;
pub mod config;
pub mod document;
pub mod exporter;
pub mod fonts;
pub mod layout;
pub mod markup;
pub mod output;
pub mod pages;
pub mod pdf;
pub mod style;
pub mod util;

// Re-export main public API
pub use config::{ExportSettings, NameCase, TemplateConfig};
pub use document::Document;
pub use exporter::{ExportNode, ExportOptions, PdfExporter};
pub use markup::{BlankLineParagraphs, DescriptionRenderer, PlainText};
pub use output::{
    GeneratedBlock, GeneratedDocument, GeneratedField, GeneratedMemory, GeneratedRegister,
    Section,
};
pub use pages::{BlankPages, DefaultPages, FnPages, PageInfo, PageTemplate};
pub use pdf::Image;
