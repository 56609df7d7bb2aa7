// Licensed under the Apache-2.0 license

//! Output types and conversion into a printable document.
//!
//! This module contains the data structures that represent the laid-out
//! register specification ([`GeneratedBlock`], [`GeneratedRegister`], etc.)
//! and the logic to convert them into document flowables.
//!
//! ## Document Flow
//!
//! ```text
//! RootNode → GeneratedDocument → Document (flowables) → PDF
//!            ├── GeneratedBlock[]     → heading, info lines, register list
//!            ├── GeneratedRegister[]  → heading, info lines, field table
//!            └── GeneratedMemory[]    → heading, info lines
//! ```
//!
//! All values are already formatted when they reach this module; nothing
//! here inspects the model.

use crate::document::{Cell, Document, Flowable, Paragraph, Span, Table, TocEntry};
use crate::markup::DescriptionRenderer;
use crate::style::TextStyle;
use crate::util::hex_const;

/// Column widths of the register list: Offset, Identifier, Name.
const REG_LIST_COLUMNS: [f32; 3] = [130.0, 120.0, 201.0];
/// Column widths of the field table: Bits, Identifier, Access, Reset, Name.
const FIELD_COLUMNS: [f32; 5] = [55.0, 95.0, 55.0, 80.0, 166.0];

//=============================================================================
// Generated Types
//=============================================================================

/// A row of a field table.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedField {
    /// `[msb:lsb]` or `[n]`.
    pub bits: String,
    pub identifier: String,
    /// UVM access string.
    pub access: String,
    /// Formatted reset value, `-` when the field has none.
    pub reset: String,
    pub name: String,
    pub description: Option<String>,
    /// Unused bits or a field named as reserved.
    pub reserved: bool,
}

/// A register with its field table.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedRegister {
    /// Hierarchical section number.
    pub number: String,
    /// Nesting level in the table of contents.
    pub depth: usize,
    /// Destination name of the section.
    pub anchor: String,
    /// Instance name with array suffix.
    pub identifier: String,
    pub name: String,
    pub description: Option<String>,
    pub absolute_address: String,
    /// Offset from the parent block.
    pub base_offset: String,
    /// Address expression of the elements, for arrays.
    pub offset_expr: Option<String>,
    pub access: String,
    pub reset: String,
    /// Size of one register in bytes.
    pub size: u64,
    /// Fields, MSB first.
    pub fields: Vec<GeneratedField>,
}

/// A memory region.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMemory {
    pub number: String,
    pub depth: usize,
    pub anchor: String,
    pub identifier: String,
    pub name: String,
    pub description: Option<String>,
    pub absolute_address: String,
    pub base_offset: String,
    pub offset_expr: Option<String>,
    pub entries: u64,
    /// Entry width in bits.
    pub width: u32,
    pub access: String,
    /// Total size in bytes.
    pub size: u64,
}

/// A row of a register list.
#[derive(Clone, Debug, PartialEq)]
pub struct RegListRow {
    /// Formatted offset, or `start - end` for a reserved gap.
    pub offset: String,
    /// Instance name, `-` for a reserved gap.
    pub identifier: String,
    /// Display name, `-` for a reserved gap.
    pub name: String,
    /// Anchor of the child's section; reserved gaps have none.
    pub link: Option<String>,
}

impl RegListRow {
    pub fn is_reserved(&self) -> bool {
        self.link.is_none()
    }
}

/// Kind of a group-like node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    AddrMap,
    RegFile,
}

/// An address map or register file with its register list.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedBlock {
    pub number: String,
    pub depth: usize,
    pub anchor: String,
    pub kind: BlockKind,
    pub identifier: String,
    pub name: String,
    pub description: Option<String>,
    /// Absolute base address.
    pub base_address: String,
    /// Size of one element in bytes.
    pub size: u64,
    pub address_width: u32,
    pub map_name: String,
    pub endianness: String,
    /// Bus width in bytes.
    pub bus_width: u64,
    pub offset_expr: Option<String>,
    pub rows: Vec<RegListRow>,
}

/// One section of the document, in reading order.
#[derive(Clone, Debug, PartialEq)]
pub enum Section {
    Block(GeneratedBlock),
    Register(GeneratedRegister),
    Memory(GeneratedMemory),
}

impl Section {
    pub fn number(&self) -> &str {
        match self {
            Section::Block(b) => &b.number,
            Section::Register(r) => &r.number,
            Section::Memory(m) => &m.number,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Section::Block(b) => b.depth,
            Section::Register(r) => r.depth,
            Section::Memory(m) => m.depth,
        }
    }

    pub fn anchor(&self) -> &str {
        match self {
            Section::Block(b) => &b.anchor,
            Section::Register(r) => &r.anchor,
            Section::Memory(m) => &m.anchor,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Section::Block(b) => &b.name,
            Section::Register(r) => &r.name,
            Section::Memory(m) => &m.name,
        }
    }
}

/// The complete laid-out specification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedDocument {
    pub title: String,
    pub sections: Vec<Section>,
}

//=============================================================================
// Document Generation
//=============================================================================

fn heading_style(depth: usize) -> TextStyle {
    if depth == 0 {
        TextStyle::Heading1
    } else {
        TextStyle::Heading2
    }
}

impl GeneratedDocument {
    /// Sections in the order they are printed, as table of contents entries.
    pub fn toc(&self) -> Vec<TocEntry> {
        self.sections
            .iter()
            .map(|s| TocEntry {
                level: s.depth(),
                number: s.number().to_string(),
                title: s.name().to_string(),
                anchor: s.anchor().to_string(),
            })
            .collect()
    }

    /// Build the printable document.
    ///
    /// The first page is left to the page template (cover), the second
    /// holds the table of contents and every top-level block starts on a
    /// new page.
    pub fn to_document(&self, renderer: &dyn DescriptionRenderer) -> Document {
        let mut doc = Document::new(self.title.clone());
        doc.toc = self.toc();

        doc.push(Flowable::PageBreak);
        doc.paragraph(Paragraph::text(TextStyle::Heading1, "Table of Contents"));
        doc.push(Flowable::TableOfContents);

        for section in &self.sections {
            match section {
                Section::Block(block) => {
                    if block.depth == 0 {
                        doc.push(Flowable::PageBreak);
                    }
                    block.generate(&mut doc, renderer);
                }
                Section::Register(reg) => reg.generate(&mut doc, renderer),
                Section::Memory(mem) => mem.generate(&mut doc, renderer),
            }
        }
        doc
    }
}

fn description(doc: &mut Document, text: Option<&str>, renderer: &dyn DescriptionRenderer) {
    if let Some(text) = text {
        for p in renderer.render(text, TextStyle::Body) {
            doc.paragraph(p);
        }
        doc.spacer(6.0);
    }
}

impl GeneratedBlock {
    fn generate(&self, doc: &mut Document, renderer: &dyn DescriptionRenderer) {
        doc.paragraph(Paragraph::heading(
            heading_style(self.depth),
            format!("{} {}", self.number, self.name),
            &self.anchor,
        ));
        description(doc, self.description.as_deref(), renderer);

        doc.paragraph(Paragraph::labeled("Identifier", &self.identifier));
        doc.paragraph(Paragraph::labeled("Base Address", &self.base_address));
        if let Some(expr) = &self.offset_expr {
            doc.paragraph(Paragraph::labeled("Offset Expression", expr));
        }
        doc.paragraph(Paragraph::labeled("Size", hex_const(self.size)));
        if self.kind == BlockKind::AddrMap {
            doc.paragraph(Paragraph::labeled(
                "Address Width",
                self.address_width.to_string(),
            ));
            doc.paragraph(Paragraph::labeled("Map Name", &self.map_name));
            doc.paragraph(Paragraph::labeled("Endianness", &self.endianness));
        }
        doc.paragraph(Paragraph::labeled(
            "Bus Width (bytes)",
            self.bus_width.to_string(),
        ));

        if self.rows.is_empty() {
            return;
        }
        doc.spacer(10.0);
        doc.paragraph(Paragraph {
            keep_with_next: true,
            ..Paragraph::text(TextStyle::Heading3, "Registers List")
        });
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let identifier = match &row.link {
                    Some(anchor) => Cell::link(&row.identifier, anchor),
                    None => Cell::text(&row.identifier),
                };
                vec![Cell::text(&row.offset), identifier, Cell::text(&row.name)]
            })
            .collect();
        doc.push(Flowable::Table(Table {
            col_widths: REG_LIST_COLUMNS.to_vec(),
            header: vec![
                Cell::header("Offset"),
                Cell::header("Identifier"),
                Cell::header("Name"),
            ],
            rows,
        }));
        doc.spacer(12.0);
    }
}

impl GeneratedRegister {
    fn generate(&self, doc: &mut Document, renderer: &dyn DescriptionRenderer) {
        doc.paragraph(Paragraph::heading(
            heading_style(self.depth),
            format!("{} {}", self.number, self.name),
            &self.anchor,
        ));
        description(doc, self.description.as_deref(), renderer);

        doc.paragraph(Paragraph::labeled("Identifier", &self.identifier));
        doc.paragraph(Paragraph::labeled("Absolute Address", &self.absolute_address));
        doc.paragraph(Paragraph::labeled("Base Offset", &self.base_offset));
        if let Some(expr) = &self.offset_expr {
            doc.paragraph(Paragraph::labeled("Offset Expression", expr));
        }
        doc.paragraph(Paragraph::labeled("Access", &self.access));
        doc.paragraph(Paragraph::labeled("Reset", &self.reset));
        doc.paragraph(Paragraph::labeled("Size (bytes)", self.size.to_string()));

        doc.spacer(10.0);
        doc.paragraph(Paragraph {
            keep_with_next: true,
            ..Paragraph::text(TextStyle::Heading3, "Fields List")
        });
        let rows = self
            .fields
            .iter()
            .map(|field| {
                let mut name = if field.reserved {
                    Cell::text(&field.name)
                } else {
                    Cell {
                        paragraphs: vec![Paragraph::new(
                            TextStyle::Table,
                            vec![Span::bold(&field.name)],
                        )],
                    }
                };
                if let Some(desc) = &field.description {
                    name.paragraphs
                        .extend(renderer.render(desc, TextStyle::Table));
                }
                vec![
                    Cell::text(&field.bits),
                    Cell::text(&field.identifier),
                    Cell::text(&field.access),
                    Cell::text(&field.reset),
                    name,
                ]
            })
            .collect();
        doc.push(Flowable::Table(Table {
            col_widths: FIELD_COLUMNS.to_vec(),
            header: vec![
                Cell::header("Bits"),
                Cell::header("Identifier"),
                Cell::header("Access"),
                Cell::header("Reset"),
                Cell::header("Name / Description"),
            ],
            rows,
        }));
        doc.spacer(12.0);
    }
}

impl GeneratedMemory {
    fn generate(&self, doc: &mut Document, renderer: &dyn DescriptionRenderer) {
        doc.paragraph(Paragraph::heading(
            heading_style(self.depth),
            format!("{} {}", self.number, self.name),
            &self.anchor,
        ));
        description(doc, self.description.as_deref(), renderer);

        doc.paragraph(Paragraph::labeled("Identifier", &self.identifier));
        doc.paragraph(Paragraph::labeled("Absolute Address", &self.absolute_address));
        doc.paragraph(Paragraph::labeled("Base Offset", &self.base_offset));
        if let Some(expr) = &self.offset_expr {
            doc.paragraph(Paragraph::labeled("Offset Expression", expr));
        }
        doc.paragraph(Paragraph::labeled("Entries", self.entries.to_string()));
        doc.paragraph(Paragraph::labeled("Width (bits)", self.width.to_string()));
        doc.paragraph(Paragraph::labeled("Access", &self.access));
        doc.paragraph(Paragraph::labeled("Size", hex_const(self.size)));
        doc.spacer(12.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::PlainText;

    fn register() -> GeneratedRegister {
        GeneratedRegister {
            number: "1.1".into(),
            depth: 1,
            anchor: "top.ctrl".into(),
            identifier: "CTRL".into(),
            name: "Control".into(),
            description: Some("Main\ncontrol".into()),
            absolute_address: "32'h0000_0000".into(),
            base_offset: "32'h0000_0000".into(),
            offset_expr: None,
            access: "RW".into(),
            reset: "32'h0000_0001".into(),
            size: 4,
            fields: vec![GeneratedField {
                bits: "[0]".into(),
                identifier: "EN".into(),
                access: "RW".into(),
                reset: "1'h1".into(),
                name: "Enable".into(),
                description: Some("Enable\nthe block".into()),
                reserved: false,
            }],
        }
    }

    fn tables(doc: &Document) -> Vec<&Table> {
        doc.flowables
            .iter()
            .filter_map(|f| match f {
                Flowable::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_register_section() {
        let generated = GeneratedDocument {
            title: "T".into(),
            sections: vec![Section::Register(register())],
        };
        let doc = generated.to_document(&PlainText);
        assert_eq!(doc.anchors().collect::<Vec<_>>(), ["top.ctrl"]);
        let text: Vec<String> = doc
            .flowables
            .iter()
            .filter_map(|f| match f {
                Flowable::Paragraph(p) => Some(p.plain_text()),
                _ => None,
            })
            .collect();
        assert!(text.contains(&"1.1 Control".to_string()));
        assert!(text.contains(&"Main control".to_string()));
        assert!(text.contains(&"Reset : 32'h0000_0001".to_string()));

        let table = tables(&doc)[0];
        assert_eq!(table.col_widths.iter().sum::<f32>(), 451.0);
        let row = &table.rows[0];
        assert_eq!(row[0], Cell::text("[0]"));
        assert_eq!(row[4].paragraphs.len(), 2);
        assert_eq!(row[4].paragraphs[1].plain_text(), "Enable the block");
    }

    #[test]
    fn test_block_rows_and_page_breaks() {
        let block = GeneratedBlock {
            number: "1".into(),
            depth: 0,
            anchor: "top".into(),
            kind: BlockKind::AddrMap,
            identifier: "TOP".into(),
            name: "top".into(),
            description: None,
            base_address: "32'h0000_0000".into(),
            size: 8,
            address_width: 32,
            map_name: "reg_map".into(),
            endianness: "UVM_NO_ENDIAN".into(),
            bus_width: 4,
            offset_expr: None,
            rows: vec![
                RegListRow {
                    offset: "32'h0000_0000 - 32'h0000_0003".into(),
                    identifier: "-".into(),
                    name: "-".into(),
                    link: None,
                },
                RegListRow {
                    offset: "32'h0000_0004".into(),
                    identifier: "CTRL".into(),
                    name: "Control".into(),
                    link: Some("top.ctrl".into()),
                },
            ],
        };
        assert!(block.rows[0].is_reserved());
        let generated = GeneratedDocument {
            title: "T".into(),
            sections: vec![Section::Block(block), Section::Register(register())],
        };
        let doc = generated.to_document(&PlainText);

        let breaks = doc
            .flowables
            .iter()
            .filter(|f| matches!(f, Flowable::PageBreak))
            .count();
        assert_eq!(breaks, 2);
        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[1].level, 1);

        let list = tables(&doc)[0];
        assert_eq!(list.rows.len(), 2);
        assert!(list.rows[0][1].paragraphs[0].spans[0].link.is_none());
        assert_eq!(
            list.rows[1][1].paragraphs[0].spans[0].link.as_deref(),
            Some("top.ctrl")
        );
    }
}
