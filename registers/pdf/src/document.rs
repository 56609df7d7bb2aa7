// Licensed under the Apache-2.0 license

//! Flowable document model.
//!
//! A [`Document`] is a flat story of flowables. The PDF writer pours them
//! into pages top to bottom; nothing here knows about page geometry.

use crate::style::TextStyle;

/// A run of text with uniform formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    /// Anchor name this span jumps to when clicked.
    pub link: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: false,
            link: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: true,
            link: None,
        }
    }

    pub fn link(text: impl Into<String>, anchor: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: false,
            link: Some(anchor.into()),
        }
    }
}

/// A block of wrapped text.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    pub style: TextStyle,
    pub spans: Vec<Span>,
    /// Destination name registered at the top of the paragraph.
    pub anchor: Option<String>,
    /// Move to the next page rather than leave this paragraph alone at the
    /// bottom of a page.
    pub keep_with_next: bool,
}

impl Paragraph {
    pub fn new(style: TextStyle, spans: Vec<Span>) -> Self {
        Paragraph {
            style,
            spans,
            anchor: None,
            keep_with_next: false,
        }
    }

    pub fn text(style: TextStyle, text: impl Into<String>) -> Self {
        Self::new(style, vec![Span::plain(text)])
    }

    /// A heading with a destination anchor.
    pub fn heading(style: TextStyle, text: impl Into<String>, anchor: impl Into<String>) -> Self {
        Paragraph {
            style,
            spans: vec![Span::plain(text)],
            anchor: Some(anchor.into()),
            keep_with_next: true,
        }
    }

    /// `<b>label : </b>value` line as used in the info blocks.
    pub fn labeled(label: &str, value: impl Into<String>) -> Self {
        Self::new(
            TextStyle::Body,
            vec![Span::bold(format!("{label} : ")), Span::plain(value)],
        )
    }

    /// Concatenated text of all spans.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A table cell holding one or more paragraphs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell {
            paragraphs: vec![Paragraph::text(TextStyle::Table, text)],
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        Cell {
            paragraphs: vec![Paragraph::new(TextStyle::Table, vec![Span::bold(text)])],
        }
    }

    pub fn link(text: impl Into<String>, anchor: impl Into<String>) -> Self {
        Cell {
            paragraphs: vec![Paragraph::new(
                TextStyle::Table,
                vec![Span::link(text, anchor)],
            )],
        }
    }
}

/// A grid table. The header row is repeated on every page the table spans.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    /// Column widths in points.
    pub col_widths: Vec<f32>,
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

/// One entry of the table of contents; also becomes a document outline item.
#[derive(Clone, Debug, PartialEq)]
pub struct TocEntry {
    /// Nesting level, 0 for top-level sections.
    pub level: usize,
    /// Hierarchical section number (`1.2.3`).
    pub number: String,
    pub title: String,
    pub anchor: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Flowable {
    Paragraph(Paragraph),
    /// Vertical space in points. Dropped at the top of a page.
    Spacer(f32),
    Table(Table),
    /// Start a new page.
    PageBreak,
    /// The table of contents, listing every entry of [`Document::toc`].
    TableOfContents,
}

/// A complete document ready for the PDF writer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub title: String,
    pub flowables: Vec<Flowable>,
    pub toc: Vec<TocEntry>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Document {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, flowable: Flowable) {
        self.flowables.push(flowable);
    }

    pub fn paragraph(&mut self, paragraph: Paragraph) {
        self.push(Flowable::Paragraph(paragraph));
    }

    pub fn spacer(&mut self, height: f32) {
        self.push(Flowable::Spacer(height));
    }

    /// Every anchor name a paragraph registers.
    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.flowables.iter().filter_map(|f| match f {
            Flowable::Paragraph(p) => p.anchor.as_deref(),
            _ => None,
        })
    }
}
