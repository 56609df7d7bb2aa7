// Licensed under the Apache-2.0 license

//! Rendering of free-text `desc` properties.

use crate::document::Paragraph;
use crate::style::TextStyle;
use crate::util::collapse_whitespace;

/// Turns a description into paragraphs of the given style.
pub trait DescriptionRenderer {
    fn render(&self, text: &str, style: TextStyle) -> Vec<Paragraph>;
}

/// Renders the whole description as one paragraph, newlines included in the
/// running text.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainText;

impl DescriptionRenderer for PlainText {
    fn render(&self, text: &str, style: TextStyle) -> Vec<Paragraph> {
        let text = collapse_whitespace(text);
        if text.is_empty() {
            return vec![];
        }
        vec![Paragraph::text(style, text)]
    }
}

/// Keeps blank-line separated blocks as separate paragraphs.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlankLineParagraphs;

impl DescriptionRenderer for BlankLineParagraphs {
    fn render(&self, text: &str, style: TextStyle) -> Vec<Paragraph> {
        let mut paragraphs = vec![];
        let mut block = String::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                if !block.is_empty() {
                    paragraphs.push(Paragraph::text(style, collapse_whitespace(&block)));
                    block.clear();
                }
                continue;
            }
            block.push(' ');
            block.push_str(line);
        }
        if !block.trim().is_empty() {
            paragraphs.push(Paragraph::text(style, collapse_whitespace(&block)));
        }
        paragraphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let p = PlainText.render("Control\nregister   for\tthe core", TextStyle::Body);
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].plain_text(), "Control register for the core");
        assert!(PlainText.render(" \n ", TextStyle::Body).is_empty());
    }

    #[test]
    fn test_blank_line_paragraphs() {
        let p = BlankLineParagraphs.render("First\nline\n\n\n  Second  \n", TextStyle::Table);
        let text: Vec<_> = p.iter().map(Paragraph::plain_text).collect();
        assert_eq!(text, ["First line", "Second"]);
        assert_eq!(p[1].style, TextStyle::Table);
    }
}
