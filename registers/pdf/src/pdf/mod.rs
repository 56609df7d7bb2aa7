// Licensed under the Apache-2.0 license

//! PDF output.
//!
//! [`PdfWriter`] lays out a [`Document`] with [`flow`], decorates every page
//! with a [`PageTemplate`] and serializes the result with `lopdf`.
//!
//! Layout runs twice: the first pass only collects the page of every anchor
//! so the table of contents can print final page numbers in the second one.

pub mod canvas;
pub mod flow;
pub mod image;

pub use canvas::{Canvas, LinkArea};
pub use image::Image;
pub use flow::{Destination, Layout, FRAME_WIDTH, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

use crate::document::{Document, TocEntry};
use crate::fonts::{encode_text, Font};
use crate::pages::{PageInfo, PageTemplate};
use crate::style::StyleSheet;
use anyhow::Context;
use chrono::NaiveDate;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::io::Write;

const PRODUCER: &str = concat!("registers-pdf ", env!("CARGO_PKG_VERSION"));

/// Serializes documents to PDF.
pub struct PdfWriter<'a> {
    pub styles: &'a StyleSheet,
    pub template: &'a dyn PageTemplate,
    /// Date handed to the page template and stored as the creation date.
    pub date: NaiveDate,
    /// Compress content streams.
    pub compress: bool,
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

fn text(s: &str) -> Object {
    Object::string_literal(encode_text(s))
}

fn destination(page: ObjectId, y: f32) -> Object {
    Object::Array(vec![
        page.into(),
        Object::Name(b"XYZ".to_vec()),
        real(0.0),
        real(y),
        Object::Null,
    ])
}

impl PdfWriter<'_> {
    /// Lays out `doc` with final page numbers in its table of contents.
    pub fn layout(&self, doc: &Document) -> Layout {
        let no_pages = HashMap::new();
        let first = flow::Flow::new(self.styles, &doc.toc, &no_pages).run(doc);
        let page_numbers = first.page_numbers();
        flow::Flow::new(self.styles, &doc.toc, &page_numbers).run(doc)
    }

    /// Builds the `lopdf` document for `doc`.
    pub fn build(&self, doc: &Document) -> anyhow::Result<lopdf::Document> {
        let layout = self.layout(doc);
        let mut pdf = lopdf::Document::with_version("1.5");

        let pages_id = pdf.new_object_id();
        let page_ids: Vec<ObjectId> = layout.pages.iter().map(|_| pdf.new_object_id()).collect();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let id = pdf.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), id);
        }
        let fonts_id = pdf.add_object(fonts);
        let resources_id = pdf.add_object(dictionary! {
            "Font" => fonts_id,
        });
        let mut embedded: Vec<(Image, ObjectId)> = vec![];

        let Layout { pages, anchors } = layout;
        for (index, body) in pages.into_iter().enumerate() {
            let info = PageInfo {
                page_number: index + 1,
                date: self.date,
                title: doc.title.clone(),
            };
            let mut decoration = Canvas::new(index + 1);
            if index == 0 {
                self.template.first_page(&mut decoration, &info);
            } else {
                self.template.later_pages(&mut decoration, &info);
            }
            decoration.append(body);
            let (operations, links, images) = decoration.into_parts();

            let resources = if images.is_empty() {
                Object::Reference(resources_id)
            } else {
                let mut xobjects = Dictionary::new();
                for (slot, image) in images.iter().enumerate() {
                    let id = match embedded.iter().find(|(known, _)| known == image) {
                        Some(&(_, id)) => id,
                        None => {
                            let id = image.add_to(&mut pdf);
                            embedded.push((image.clone(), id));
                            id
                        }
                    };
                    xobjects.set(canvas::image_name(slot), id);
                }
                Object::Dictionary(dictionary! {
                    "Font" => fonts_id,
                    "XObject" => xobjects,
                })
            };

            let content = Content { operations }
                .encode()
                .with_context(|| format!("failed to encode page {}", index + 1))?;
            let content_id = pdf.add_object(Stream::new(Dictionary::new(), content));

            let mut annots = vec![];
            for link in &links {
                let Some(dest) = anchors.get(&link.anchor) else {
                    log::warn!("link to unknown anchor {:?} dropped", link.anchor);
                    continue;
                };
                annots.push(Object::Dictionary(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => link.rect.iter().copied().map(real).collect::<Vec<_>>(),
                    "Border" => vec![Object::Integer(0); 3],
                    "Dest" => destination(page_ids[dest.page], dest.y),
                }));
            }

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
                "Resources" => resources,
                "Contents" => content_id,
            };
            if !annots.is_empty() {
                page.set("Annots", annots);
            }
            pdf.objects.insert(page_ids[index], Object::Dictionary(page));
        }

        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|&id| Object::from(id)).collect::<Vec<_>>(),
                "Count" => Object::Integer(page_ids.len() as i64),
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if let Some(outlines_id) = add_outline(&mut pdf, &doc.toc, &anchors, &page_ids) {
            catalog.set("Outlines", outlines_id);
            catalog.set("PageMode", "UseOutlines");
        }
        let catalog_id = pdf.add_object(catalog);

        let created = self
            .date
            .and_hms_opt(0, 0, 0)
            .map(|d| d.format("D:%Y%m%d%H%M%S").to_string())
            .unwrap_or_default();
        let info_id = pdf.add_object(dictionary! {
            "Title" => text(&doc.title),
            "Creator" => text("rdl-pdf"),
            "Producer" => text(PRODUCER),
            "CreationDate" => text(&created),
        });
        pdf.trailer.set("Root", catalog_id);
        pdf.trailer.set("Info", info_id);

        if self.compress {
            pdf.compress();
        }
        Ok(pdf)
    }

    /// Writes `doc` as PDF to `out`.
    pub fn write<W: Write>(&self, doc: &Document, out: &mut W) -> anyhow::Result<()> {
        let mut pdf = self.build(doc)?;
        pdf.save_to(out).context("failed to write PDF")?;
        Ok(())
    }
}

/// Adds the bookmark tree mirroring `toc`. Entries whose anchor was never
/// placed are skipped.
fn add_outline(
    pdf: &mut lopdf::Document,
    toc: &[TocEntry],
    anchors: &HashMap<String, Destination>,
    page_ids: &[ObjectId],
) -> Option<ObjectId> {
    let entries: Vec<&TocEntry> = toc
        .iter()
        .filter(|e| anchors.contains_key(&e.anchor))
        .collect();
    if entries.is_empty() {
        return None;
    }

    // Parent of every entry, found with a stack of open levels, and the
    // children of every entry in document order
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(entries.len());
    let mut kids: Vec<Vec<usize>> = vec![vec![]; entries.len()];
    let mut top: Vec<usize> = vec![];
    let mut stack: Vec<usize> = vec![];
    for (i, entry) in entries.iter().enumerate() {
        while let Some(&open) = stack.last() {
            if entries[open].level >= entry.level {
                stack.pop();
            } else {
                break;
            }
        }
        let parent = stack.last().copied();
        match parent {
            Some(p) => kids[p].push(i),
            None => top.push(i),
        }
        parents.push(parent);
        stack.push(i);
    }
    let mut descendants = vec![0i64; entries.len()];
    for i in (0..entries.len()).rev() {
        if let Some(p) = parents[i] {
            descendants[p] += descendants[i] + 1;
        }
    }

    let root_id = pdf.new_object_id();
    let ids: Vec<ObjectId> = entries.iter().map(|_| pdf.new_object_id()).collect();

    let link_siblings = |dict: &mut Dictionary, siblings: &[usize], pos: usize| {
        if pos > 0 {
            dict.set("Prev", ids[siblings[pos - 1]]);
        }
        if pos + 1 < siblings.len() {
            dict.set("Next", ids[siblings[pos + 1]]);
        }
    };

    let mut items: Vec<Dictionary> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let dest = anchors[&entry.anchor];
            let mut item = dictionary! {
                "Title" => text(&format!("{} {}", entry.number, entry.title)),
                "Parent" => parents[i].map_or(root_id, |p| ids[p]),
                "Dest" => destination(page_ids[dest.page], dest.y),
            };
            if let (Some(&first), Some(&last)) = (kids[i].first(), kids[i].last()) {
                item.set("First", ids[first]);
                item.set("Last", ids[last]);
                item.set("Count", Object::Integer(descendants[i]));
            }
            item
        })
        .collect();
    for siblings in kids.iter().chain(std::iter::once(&top)) {
        for (pos, &i) in siblings.iter().enumerate() {
            link_siblings(&mut items[i], siblings, pos);
        }
    }
    for (i, item) in items.into_iter().enumerate() {
        pdf.objects.insert(ids[i], Object::Dictionary(item));
    }

    let mut root = dictionary! {
        "Type" => "Outlines",
        "Count" => Object::Integer(entries.len() as i64),
    };
    if let (Some(&first), Some(&last)) = (top.first(), top.last()) {
        root.set("First", ids[first]);
        root.set("Last", ids[last]);
    }
    pdf.objects.insert(root_id, Object::Dictionary(root));
    Some(root_id)
}
