// Licensed under the Apache-2.0 license

//! Drawing surface for one page.
//!
//! A [`Canvas`] records PDF content-stream operations. Page templates draw on
//! it directly; the flow layout uses it to paint paragraphs and tables.

use super::image::Image;
use crate::fonts::{encode_text, Font};
use crate::style::Color;
use lopdf::content::Operation;
use lopdf::Object;

/// A clickable area that jumps to a named anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkArea {
    /// `[x1, y1, x2, y2]` in page coordinates.
    pub rect: [f32; 4],
    pub anchor: String,
}

/// Records drawing operations for a single page.
pub struct Canvas {
    page_number: usize,
    ops: Vec<Operation>,
    links: Vec<LinkArea>,
    /// Images referenced by `Do` operations, `Im0` first.
    images: Vec<Image>,
    font: Font,
    font_size: f32,
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

/// Resource name of the image at `index` in a page's image list.
pub(crate) fn image_name(index: usize) -> String {
    format!("Im{index}")
}

fn image_index(name: &[u8]) -> Option<usize> {
    std::str::from_utf8(name.strip_prefix(b"Im")?).ok()?.parse().ok()
}

impl Canvas {
    /// An empty canvas for the 1-based `page_number`.
    pub fn new(page_number: usize) -> Self {
        Canvas {
            page_number,
            ops: vec![],
            links: vec![],
            images: vec![],
            font: Font::Helvetica,
            font_size: 10.0,
        }
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn save_state(&mut self) {
        self.ops.push(Operation::new("q", vec![]));
    }

    pub fn restore_state(&mut self) {
        self.ops.push(Operation::new("Q", vec![]));
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.ops.push(Operation::new(
            "rg",
            vec![real(color.r), real(color.g), real(color.b)],
        ));
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(Operation::new(
            "RG",
            vec![real(color.r), real(color.g), real(color.b)],
        ));
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.ops.push(Operation::new("w", vec![real(width)]));
    }

    /// Select the font used by the following `draw_*` calls.
    pub fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.font_size = size;
    }

    /// Width of `text` in the current font.
    pub fn string_width(&self, text: &str) -> f32 {
        self.font.text_width(text, self.font_size)
    }

    /// Draw `text` with its baseline starting at `(x, y)`.
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(self.font.resource_name().as_bytes().to_vec()),
                real(self.font_size),
            ],
        ));
        self.ops.push(Operation::new("Td", vec![real(x), real(y)]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(text))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Draw `text` so that it ends at `x`.
    pub fn draw_right_string(&mut self, x: f32, y: f32, text: &str) {
        let w = self.string_width(text);
        self.draw_string(x - w, y, text);
    }

    /// Draw `text` centred on `x`.
    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) {
        let w = self.string_width(text);
        self.draw_string(x - w / 2.0, y, text);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(Operation::new("m", vec![real(x1), real(y1)]));
        self.ops.push(Operation::new("l", vec![real(x2), real(y2)]));
        self.ops.push(Operation::new("S", vec![]));
    }

    /// Rectangle with its lower-left corner at `(x, y)`.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, stroke: bool, fill: bool) {
        if !stroke && !fill {
            return;
        }
        self.ops.push(Operation::new(
            "re",
            vec![real(x), real(y), real(width), real(height)],
        ));
        let paint = match (stroke, fill) {
            (true, true) => "B",
            (false, true) => "f",
            _ => "S",
        };
        self.ops.push(Operation::new(paint, vec![]));
    }

    /// Draw `image` stretched over the `width` x `height` box whose
    /// lower-left corner is at `(x, y)`.
    pub fn draw_image(&mut self, image: &Image, x: f32, y: f32, width: f32, height: f32) {
        let name = image_name(self.image_slot(image));
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
        ));
        self.ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn image_slot(&mut self, image: &Image) -> usize {
        match self.images.iter().position(|known| known == image) {
            Some(index) => index,
            None => {
                self.images.push(image.clone());
                self.images.len() - 1
            }
        }
    }

    /// Make `rect` (`[x1, y1, x2, y2]`) a link to `anchor`.
    pub fn link(&mut self, rect: [f32; 4], anchor: &str) {
        self.links.push(LinkArea {
            rect,
            anchor: anchor.to_string(),
        });
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn links(&self) -> &[LinkArea] {
        &self.links
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Paint everything recorded on `other` over this canvas.
    pub(crate) fn append(&mut self, other: Canvas) {
        let Canvas {
            mut ops,
            links,
            images,
            ..
        } = other;
        let slots: Vec<usize> = images.iter().map(|image| self.image_slot(image)).collect();
        for op in ops.iter_mut().filter(|op| op.operator == "Do") {
            if let Some(Object::Name(name)) = op.operands.first_mut() {
                if let Some(&slot) = image_index(name).and_then(|i| slots.get(i)) {
                    *name = image_name(slot).into_bytes();
                }
            }
        }
        self.ops.extend(ops);
        self.links.extend(links);
    }

    pub(crate) fn into_parts(self) -> (Vec<Operation>, Vec<LinkArea>, Vec<Image>) {
        (self.ops, self.links, self.images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_string_ops() {
        let mut canvas = Canvas::new(3);
        canvas.set_font(Font::TimesBold, 8.0);
        canvas.draw_string(10.0, 20.0, "Page 3");
        let names: Vec<_> = canvas
            .operations()
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(names, ["BT", "Tf", "Td", "Tj", "ET"]);
        assert!(matches!(
            &canvas.operations()[1].operands[0],
            Object::Name(name) if name == b"F4"
        ));
        assert_eq!(canvas.page_number(), 3);
    }

    #[test]
    fn test_empty_string_draws_nothing() {
        let mut canvas = Canvas::new(1);
        canvas.draw_string(0.0, 0.0, "");
        canvas.rect(0.0, 0.0, 1.0, 1.0, false, false);
        assert!(canvas.operations().is_empty());
    }

    #[test]
    fn test_right_and_centred() {
        let mut canvas = Canvas::new(1);
        canvas.set_font(Font::Courier, 10.0);
        canvas.draw_right_string(100.0, 0.0, "abcd");
        canvas.draw_centred_string(100.0, 0.0, "abcd");
        let td: Vec<f32> = canvas
            .operations()
            .iter()
            .filter(|op| op.operator == "Td")
            .map(|op| match op.operands[0] {
                Object::Real(x) => x,
                _ => panic!("Td operand is not a real"),
            })
            .collect();
        assert_eq!(td, [76.0, 88.0]);
    }

    #[test]
    fn test_links() {
        let mut canvas = Canvas::new(1);
        canvas.link([1.0, 2.0, 3.0, 4.0], "top.ctrl");
        let (_, links, _) = canvas.into_parts();
        assert_eq!(links[0].anchor, "top.ctrl");
    }

    fn do_names(canvas: &Canvas) -> Vec<Vec<u8>> {
        canvas
            .operations()
            .iter()
            .filter(|op| op.operator == "Do")
            .map(|op| op.operands[0].as_name().unwrap().to_vec())
            .collect()
    }

    #[test]
    fn test_draw_image() {
        let logo = Image::from_rgb8(1, 1, vec![0, 0, 0]).unwrap();
        let mut canvas = Canvas::new(1);
        canvas.draw_image(&logo, 405.0, 720.0, 140.0, 60.0);
        canvas.draw_image(&logo.clone(), 0.0, 0.0, 1.0, 1.0);

        let names: Vec<_> = canvas
            .operations()
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(names, ["q", "cm", "Do", "Q", "q", "cm", "Do", "Q"]);
        let cm: Vec<f32> = canvas.operations()[1]
            .operands
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(cm, [140.0, 0.0, 0.0, 60.0, 405.0, 720.0]);
        assert_eq!(do_names(&canvas), [b"Im0".to_vec(), b"Im0".to_vec()]);
        assert_eq!(canvas.images().len(), 1);
    }

    #[test]
    fn test_append_renames_images() {
        let a = Image::from_rgb8(1, 1, vec![1, 1, 1]).unwrap();
        let b = Image::from_rgb8(1, 1, vec![2, 2, 2]).unwrap();
        let mut decoration = Canvas::new(2);
        decoration.draw_image(&a, 0.0, 0.0, 1.0, 1.0);
        let mut body = Canvas::new(2);
        body.draw_image(&b, 0.0, 0.0, 1.0, 1.0);
        body.draw_image(&a, 0.0, 0.0, 1.0, 1.0);
        body.link([0.0; 4], "x");

        decoration.append(body);
        assert_eq!(
            do_names(&decoration),
            [b"Im0".to_vec(), b"Im1".to_vec(), b"Im0".to_vec()]
        );
        assert_eq!(decoration.images(), [a, b]);
        assert_eq!(decoration.links().len(), 1);
    }
}
