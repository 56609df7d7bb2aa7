// Licensed under the Apache-2.0 license

//! Colours and paragraph styles.

use crate::fonts::Font;
use serde::Deserialize;

/// RGB colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_hex(0x000000);
    pub const WHITE: Color = Color::from_hex(0xffffff);
    pub const RED: Color = Color::from_hex(0xff0000);
    pub const BLUE: Color = Color::from_hex(0x0000ff);

    /// Colour from a `0xRRGGBB` value.
    pub const fn from_hex(rgb: u32) -> Self {
        Color {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    /// Parses `#RRGGBB` or `0xRRGGBB`.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .ok_or_else(|| format!("colour {s:?} must look like #RRGGBB"))?;
        if hex.len() != 6 {
            return Err(format!("colour {s:?} must have 6 hex digits"));
        }
        u32::from_str_radix(hex, 16)
            .map(Color::from_hex)
            .map_err(|e| format!("colour {s:?}: {e}"))
    }
}

/// Main text colour of the document.
pub const DOC_COLOR: Color = Color::from_hex(0x24001e);
/// Background of table header rows.
pub const TABLE_HEADER_BG: Color = Color::from_hex(0xd9d9d9);
/// Colour of internal links.
pub const LINK_COLOR: Color = Color::BLUE;

/// Named text styles used by the document model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextStyle {
    /// Section titles (`H1p`).
    Heading1,
    /// Sub-section titles (`H2p`).
    Heading2,
    /// Table captions (`H3p`).
    Heading3,
    /// Body text (`BodyTextP`).
    Body,
    /// Table cell text (`BodyTextT`).
    Table,
}

/// Font, size and spacing of a paragraph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub font: Font,
    pub bold_font: Font,
    pub size: f32,
    pub leading: f32,
    pub color: Color,
    pub space_before: f32,
    pub space_after: f32,
}

/// Styles for every [`TextStyle`].
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSheet {
    pub heading1: ParagraphStyle,
    pub heading2: ParagraphStyle,
    pub heading3: ParagraphStyle,
    pub body: ParagraphStyle,
    pub table: ParagraphStyle,
    /// Grid and text colour of tables.
    pub table_grid: Color,
    pub table_header_bg: Color,
    pub link: Color,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let body = ParagraphStyle {
            font: Font::Helvetica,
            bold_font: Font::HelveticaBold,
            size: 10.0,
            leading: 12.0,
            color: DOC_COLOR,
            space_before: 0.0,
            space_after: 0.0,
        };
        Self {
            heading1: ParagraphStyle {
                font: Font::HelveticaBold,
                size: 20.0,
                leading: 24.0,
                space_before: 6.0,
                space_after: 14.0,
                ..body
            },
            heading2: ParagraphStyle {
                font: Font::HelveticaBold,
                size: 15.0,
                leading: 18.0,
                space_before: 4.0,
                space_after: 10.0,
                ..body
            },
            heading3: ParagraphStyle {
                font: Font::Helvetica,
                size: 13.0,
                leading: 16.0,
                space_before: 4.0,
                space_after: 8.0,
                ..body
            },
            table: body,
            body,
            table_grid: DOC_COLOR,
            table_header_bg: TABLE_HEADER_BG,
            link: LINK_COLOR,
        }
    }
}

impl StyleSheet {
    pub fn get(&self, style: TextStyle) -> &ParagraphStyle {
        match style {
            TextStyle::Heading1 => &self.heading1,
            TextStyle::Heading2 => &self.heading2,
            TextStyle::Heading3 => &self.heading3,
            TextStyle::Body => &self.body,
            TextStyle::Table => &self.table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        let c = Color::try_from("#ff8000".to_string()).unwrap();
        assert_eq!(c, Color::from_hex(0xff8000));
        assert_eq!(c.r, 1.0);
        assert_eq!(c.b, 0.0);
        assert_eq!(
            Color::try_from("0x000000".to_string()).unwrap(),
            Color::BLACK
        );
        assert!(Color::try_from("#fff".to_string()).is_err());
        assert!(Color::try_from("red".to_string()).is_err());
    }
}
