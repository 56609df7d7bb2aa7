// Licensed under the Apache-2.0 license

//! Pours document flowables into A4 pages.
//!
//! The layout is a single top-down frame per page. Paragraphs split between
//! lines, tables between rows (the header row is repeated), and headings
//! marked `keep_with_next` never sit alone at the bottom of a page.

use super::canvas::Canvas;
use crate::document::{Cell, Document, Flowable, Paragraph, Span, Table, TocEntry};
use crate::fonts::Font;
use crate::style::{Color, ParagraphStyle, StyleSheet, TextStyle};
use std::collections::HashMap;

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 72.0;
pub const FRAME_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const FRAME_TOP: f32 = PAGE_HEIGHT - MARGIN;

const CELL_PAD_X: f32 = 6.0;
const CELL_PAD_Y: f32 = 3.0;
const CELL_PARAGRAPH_GAP: f32 = 2.0;
/// Space reserved below a `keep_with_next` paragraph.
const KEEP_WITH_NEXT: f32 = 60.0;
const TOC_INDENT: f32 = 14.0;
const TOC_PAGE_COLUMN: f32 = 40.0;

/// Where an anchor landed: 0-based page index and the y coordinate of the
/// top of its paragraph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Destination {
    pub page: usize,
    pub y: f32,
}

/// Result of a layout pass.
pub struct Layout {
    pub pages: Vec<Canvas>,
    pub anchors: HashMap<String, Destination>,
}

impl Layout {
    /// 1-based page number of every anchor.
    pub fn page_numbers(&self) -> HashMap<String, usize> {
        self.anchors
            .iter()
            .map(|(name, dest)| (name.clone(), dest.page + 1))
            .collect()
    }
}

//=============================================================================
// Line breaking
//=============================================================================

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Run {
    pub text: String,
    pub font: Font,
    pub link: Option<String>,
    /// Offset from the start of the line.
    pub x: f32,
    pub width: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Line {
    pub runs: Vec<Run>,
    pub width: f32,
}

struct Token<'a> {
    text: String,
    span: &'a Span,
    space_before: bool,
}

fn tokenize(spans: &[Span]) -> Vec<Token<'_>> {
    let mut tokens = vec![];
    let mut pending_space = false;
    for span in spans {
        let mut word = String::new();
        let mut word_space = false;
        for c in span.text.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token {
                        text: std::mem::take(&mut word),
                        span,
                        space_before: word_space,
                    });
                }
                pending_space = true;
            } else {
                if word.is_empty() {
                    word_space = pending_space;
                    pending_space = false;
                }
                word.push(c);
            }
        }
        if !word.is_empty() {
            tokens.push(Token {
                text: word,
                span,
                space_before: word_space,
            });
        }
    }
    tokens
}

/// Splits a word wider than `width` into pieces that fit.
fn break_word(word: &str, font: Font, size: f32, width: f32) -> Vec<String> {
    let mut pieces = vec![];
    let mut piece = String::new();
    for c in word.chars() {
        let mut candidate = piece.clone();
        candidate.push(c);
        if !piece.is_empty() && font.text_width(&candidate, size) > width {
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        } else {
            piece = candidate;
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

impl Line {
    fn push(&mut self, text: &str, font: Font, link: Option<&String>, space: f32, width: f32) {
        if let Some(last) = self.runs.last_mut() {
            if last.font == font && last.link.as_ref() == link {
                if space > 0.0 {
                    last.text.push(' ');
                }
                last.text.push_str(text);
                last.width += space + width;
                self.width += space + width;
                return;
            }
        }
        self.runs.push(Run {
            text: text.to_string(),
            font,
            link: link.cloned(),
            x: self.width + space,
            width,
        });
        self.width += space + width;
    }
}

/// Greedy line breaking of `spans` into lines no wider than `width`.
pub(crate) fn wrap(spans: &[Span], style: &ParagraphStyle, width: f32) -> Vec<Line> {
    let size = style.size;
    let mut lines = vec![];
    let mut line = Line::default();
    for token in tokenize(spans) {
        let font = if token.span.bold {
            style.bold_font
        } else {
            style.font
        };
        let link = token.span.link.as_ref();
        let word_width = font.text_width(&token.text, size);
        let space = if token.space_before && !line.runs.is_empty() {
            font.text_width(" ", size)
        } else {
            0.0
        };

        if line.width + space + word_width <= width {
            line.push(&token.text, font, link, space, word_width);
            continue;
        }
        if !line.runs.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if word_width <= width {
            line.push(&token.text, font, link, 0.0, word_width);
            continue;
        }
        let pieces = break_word(&token.text, font, size, width);
        let count = pieces.len();
        for (i, piece) in pieces.into_iter().enumerate() {
            let w = font.text_width(&piece, size);
            line.push(&piece, font, link, 0.0, w);
            if i + 1 < count {
                lines.push(std::mem::take(&mut line));
            }
        }
    }
    if !line.runs.is_empty() {
        lines.push(line);
    }
    lines
}

//=============================================================================
// Flow
//=============================================================================

/// A paragraph broken into lines for a given width.
struct Block<'a> {
    style: &'a ParagraphStyle,
    lines: Vec<Line>,
}

impl Block<'_> {
    fn height(&self) -> f32 {
        self.lines.len() as f32 * self.style.leading
    }
}

/// Position of one line inside a table cell, measured down from the top of
/// the cell contents.
struct CellLine {
    top: f32,
    bottom: f32,
    block: usize,
    line: usize,
}

fn cell_lines(blocks: &[Block<'_>]) -> Vec<CellLine> {
    let mut lines = vec![];
    let mut y = 0.0;
    for (b, block) in blocks.iter().enumerate() {
        for l in 0..block.lines.len() {
            lines.push(CellLine {
                top: y,
                bottom: y + block.style.leading,
                block: b,
                line: l,
            });
            y += block.style.leading;
        }
        y += CELL_PARAGRAPH_GAP;
    }
    lines
}

struct Row<'a> {
    cells: Vec<Vec<Block<'a>>>,
    height: f32,
}

pub(crate) struct Flow<'a> {
    styles: &'a StyleSheet,
    toc: &'a [TocEntry],
    /// Page numbers from a previous pass, used by the table of contents.
    page_numbers: &'a HashMap<String, usize>,
    pages: Vec<Canvas>,
    anchors: HashMap<String, Destination>,
    y: f32,
}

impl<'a> Flow<'a> {
    pub fn new(
        styles: &'a StyleSheet,
        toc: &'a [TocEntry],
        page_numbers: &'a HashMap<String, usize>,
    ) -> Self {
        Flow {
            styles,
            toc,
            page_numbers,
            pages: vec![Canvas::new(1)],
            anchors: HashMap::new(),
            y: FRAME_TOP,
        }
    }

    /// Lay out every flowable of `doc`.
    pub fn run(mut self, doc: &Document) -> Layout {
        for flowable in &doc.flowables {
            match flowable {
                Flowable::Paragraph(p) => self.place_paragraph(p),
                Flowable::Spacer(h) => self.place_spacer(*h),
                Flowable::Table(t) => self.place_table(t),
                Flowable::PageBreak => self.new_page(),
                Flowable::TableOfContents => self.place_toc(),
            }
        }
        Layout {
            pages: self.pages,
            anchors: self.anchors,
        }
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Canvas::new(number));
        self.y = FRAME_TOP;
    }

    fn canvas(&mut self) -> &mut Canvas {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn at_top(&self) -> bool {
        self.y >= FRAME_TOP - 0.01
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN
    }

    fn place_spacer(&mut self, height: f32) {
        if self.at_top() {
            return;
        }
        self.y = (self.y - height).max(MARGIN);
    }

    fn place_paragraph(&mut self, p: &Paragraph) {
        let styles = self.styles;
        let style = styles.get(p.style);
        let lines = wrap(&p.spans, style, FRAME_WIDTH);
        let height = lines.len() as f32 * style.leading;

        if !self.at_top() {
            self.y -= style.space_before;
        }
        let needed = if p.keep_with_next {
            height + KEEP_WITH_NEXT
        } else {
            style.leading
        };
        if !self.at_top() && self.remaining() < needed {
            self.new_page();
        }
        if let Some(anchor) = &p.anchor {
            let dest = Destination {
                page: self.pages.len() - 1,
                y: self.y,
            };
            self.anchors.insert(anchor.clone(), dest);
        }
        for line in &lines {
            if self.remaining() < style.leading && !self.at_top() {
                self.new_page();
            }
            let baseline = self.y - style.size;
            let color = style.color;
            let link_color = self.styles.link;
            draw_line(self.canvas(), line, MARGIN, baseline, style, color, link_color);
            self.y -= style.leading;
        }
        self.y -= style.space_after;
    }

    fn layout_cell(&self, cell: &Cell, width: f32) -> Vec<Block<'a>> {
        let styles: &'a StyleSheet = self.styles;
        cell.paragraphs
            .iter()
            .map(|p| {
                let style = styles.get(p.style);
                Block {
                    style,
                    lines: wrap(&p.spans, style, width - 2.0 * CELL_PAD_X),
                }
            })
            .collect()
    }

    fn layout_row(&self, cells: &[Cell], widths: &[f32]) -> Row<'a> {
        let cells: Vec<_> = cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| self.layout_cell(cell, *w))
            .collect();
        let content = cells
            .iter()
            .map(|blocks| {
                let gaps = blocks.len().saturating_sub(1) as f32 * CELL_PARAGRAPH_GAP;
                blocks.iter().map(Block::height).sum::<f32>() + gaps
            })
            .fold(0.0, f32::max);
        let min = self.styles.table.leading;
        Row {
            cells,
            height: content.max(min) + 2.0 * CELL_PAD_Y,
        }
    }

    fn draw_row(&mut self, row: &Row, widths: &[f32], header: bool) {
        let top = self.y;
        let bottom = top - row.height;
        let grid = self.styles.table_grid;
        let header_bg = self.styles.table_header_bg;
        let link_color = self.styles.link;
        let canvas = self.canvas();

        if header {
            canvas.set_fill_color(header_bg);
            canvas.rect(MARGIN, bottom, widths.iter().sum(), row.height, false, true);
        }
        canvas.set_stroke_color(grid);
        canvas.set_line_width(0.5);
        let mut x = MARGIN;
        for (blocks, w) in row.cells.iter().zip(widths) {
            canvas.rect(x, bottom, *w, row.height, true, false);
            let mut ty = top - CELL_PAD_Y;
            for block in blocks {
                for line in &block.lines {
                    let baseline = ty - block.style.size;
                    draw_line(
                        canvas,
                        line,
                        x + CELL_PAD_X,
                        baseline,
                        block.style,
                        block.style.color,
                        link_color,
                    );
                    ty -= block.style.leading;
                }
                ty -= CELL_PARAGRAPH_GAP;
            }
            x += w;
        }
        if header {
            canvas.set_stroke_color(Color::BLACK);
            canvas.set_line_width(1.0);
            canvas.line(MARGIN, bottom, x, bottom);
        }
        self.y = bottom;
    }

    fn place_table(&mut self, table: &Table) {
        let widths = &table.col_widths;
        let header = self.layout_row(&table.header, widths);
        let rows: Vec<_> = table
            .rows
            .iter()
            .map(|r| self.layout_row(r, widths))
            .collect();

        let first = rows.first().map_or(0.0, |r| r.height);
        if !self.at_top() && self.remaining() < header.height + first {
            self.new_page();
        }
        self.draw_row(&header, widths, true);
        let capacity = FRAME_TOP - MARGIN - header.height;
        for row in &rows {
            if row.height > capacity {
                self.place_tall_row(row, widths, &header);
                continue;
            }
            if self.remaining() < row.height {
                self.new_page();
                self.draw_row(&header, widths, true);
            }
            self.draw_row(row, widths, false);
        }
    }

    /// Draws a row taller than a page in slices, breaking between the
    /// lines of its cells. Each continuation page repeats the header.
    fn place_tall_row(&mut self, row: &Row, widths: &[f32], header: &Row) {
        log::warn!(
            "table row of {:.0}pt does not fit on one page and is split",
            row.height
        );
        let cells: Vec<Vec<CellLine>> = row.cells.iter().map(|blocks| cell_lines(blocks)).collect();
        let mut next = vec![0; cells.len()];
        // Offset into the cell contents of the top of the current slice
        let mut consumed = 0.0;
        let mut fresh_page = false;
        loop {
            let cut = consumed + self.remaining() - 2.0 * CELL_PAD_Y;
            let mut ends: Vec<usize> = cells
                .iter()
                .zip(&next)
                .map(|(lines, &start)| {
                    start + lines[start..].iter().take_while(|l| l.bottom <= cut).count()
                })
                .collect();
            if ends == next {
                if !fresh_page {
                    self.new_page();
                    self.draw_row(header, widths, true);
                    fresh_page = true;
                    continue;
                }
                // A single line taller than the frame still moves forward
                ends = cells
                    .iter()
                    .zip(&next)
                    .map(|(lines, &start)| (start + 1).min(lines.len()))
                    .collect();
            }

            let content = cells
                .iter()
                .zip(next.iter().zip(&ends))
                .flat_map(|(lines, (&start, &end))| lines[start..end].iter())
                .map(|l| l.bottom - consumed)
                .fold(0.0, f32::max);
            self.draw_slice(row, widths, &cells, &next, &ends, consumed, content);
            next = ends;

            let pending = cells
                .iter()
                .zip(&next)
                .filter_map(|(lines, &start)| lines.get(start))
                .map(|l| l.top)
                .fold(f32::INFINITY, f32::min);
            if pending.is_infinite() {
                break;
            }
            consumed = pending;
            self.new_page();
            self.draw_row(header, widths, true);
            fresh_page = true;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_slice(
        &mut self,
        row: &Row,
        widths: &[f32],
        cells: &[Vec<CellLine>],
        start: &[usize],
        end: &[usize],
        consumed: f32,
        content: f32,
    ) {
        let top = self.y;
        let height = content + 2.0 * CELL_PAD_Y;
        let bottom = top - height;
        let grid = self.styles.table_grid;
        let link_color = self.styles.link;
        let canvas = self.canvas();

        canvas.set_stroke_color(grid);
        canvas.set_line_width(0.5);
        let mut x = MARGIN;
        for (i, w) in widths.iter().enumerate() {
            canvas.rect(x, bottom, *w, height, true, false);
            let lines = cells.get(i).map_or(&[][..], |c| &c[start[i]..end[i]]);
            for l in lines {
                let block = &row.cells[i][l.block];
                let baseline = top - CELL_PAD_Y - (l.top - consumed) - block.style.size;
                draw_line(
                    canvas,
                    &block.lines[l.line],
                    x + CELL_PAD_X,
                    baseline,
                    block.style,
                    block.style.color,
                    link_color,
                );
            }
            x += w;
        }
        self.y = bottom;
    }

    fn place_toc(&mut self) {
        let styles = self.styles;
        let style = styles.get(TextStyle::Body);
        let link_color = self.styles.link;
        let toc = self.toc;
        for entry in toc {
            let indent = entry.level as f32 * TOC_INDENT;
            let title = format!("{}  {}", entry.number, entry.title);
            let spans = [Span::link(title, entry.anchor.clone())];
            let lines = wrap(&spans, style, FRAME_WIDTH - indent - TOC_PAGE_COLUMN);
            let page = self
                .page_numbers
                .get(&entry.anchor)
                .map(|n| n.to_string())
                .unwrap_or_default();
            let count = lines.len();
            for (i, line) in lines.iter().enumerate() {
                if self.remaining() < style.leading && !self.at_top() {
                    self.new_page();
                }
                let baseline = self.y - style.size;
                let canvas = self.canvas();
                draw_line(
                    canvas,
                    line,
                    MARGIN + indent,
                    baseline,
                    style,
                    style.color,
                    link_color,
                );
                if i + 1 == count {
                    canvas.set_fill_color(style.color);
                    canvas.set_font(style.font, style.size);
                    canvas.draw_right_string(MARGIN + FRAME_WIDTH, baseline, &page);
                }
                self.y -= style.leading;
            }
        }
    }
}

fn draw_line(
    canvas: &mut Canvas,
    line: &Line,
    x: f32,
    baseline: f32,
    style: &ParagraphStyle,
    color: Color,
    link_color: Color,
) {
    for run in &line.runs {
        let run_x = x + run.x;
        canvas.set_fill_color(if run.link.is_some() { link_color } else { color });
        canvas.set_font(run.font, style.size);
        canvas.draw_string(run_x, baseline, &run.text);
        if let Some(anchor) = &run.link {
            canvas.link(
                [
                    run_x,
                    baseline - style.size * 0.25,
                    run_x + run.width,
                    baseline + style.size,
                ],
                anchor,
            );
        }
    }
}
