// Licensed under the Apache-2.0 license

//! Fixed page decorations.
//!
//! A [`PageTemplate`] paints what does not belong to the flowing content:
//! the cover page and the header/footer of every later page. It is called
//! before the page content is drawn.

use crate::config::TemplateConfig;
use crate::fonts::Font;
use crate::pdf::{Canvas, Image};
use crate::style::DOC_COLOR;
use chrono::NaiveDate;

/// What a template knows about the page being decorated.
#[derive(Clone, Debug, PartialEq)]
pub struct PageInfo {
    /// 1-based page number.
    pub page_number: usize,
    /// Date printed on the pages.
    pub date: NaiveDate,
    /// Document title.
    pub title: String,
}

/// Draws the fixed parts of pages.
pub trait PageTemplate {
    /// Decorate the first (cover) page.
    fn first_page(&self, canvas: &mut Canvas, info: &PageInfo);

    /// Decorate every page after the first.
    fn later_pages(&self, canvas: &mut Canvas, info: &PageInfo);
}

/// Template built from two closures.
///
/// ```
/// use registers_pdf::pages::{FnPages, PageInfo, PageTemplate};
/// use registers_pdf::pdf::Canvas;
///
/// let template = FnPages::new(
///     |canvas: &mut Canvas, _: &PageInfo| canvas.draw_string(100.0, 700.0, "Cover"),
///     |canvas: &mut Canvas, info: &PageInfo| {
///         canvas.draw_string(500.0, 40.0, &info.page_number.to_string())
///     },
/// );
/// # let _: &dyn PageTemplate = &template;
/// ```
pub struct FnPages<F, G> {
    first: F,
    later: G,
}

impl<F, G> FnPages<F, G>
where
    F: Fn(&mut Canvas, &PageInfo),
    G: Fn(&mut Canvas, &PageInfo),
{
    pub fn new(first: F, later: G) -> Self {
        FnPages { first, later }
    }
}

impl<F, G> PageTemplate for FnPages<F, G>
where
    F: Fn(&mut Canvas, &PageInfo),
    G: Fn(&mut Canvas, &PageInfo),
{
    fn first_page(&self, canvas: &mut Canvas, info: &PageInfo) {
        (self.first)(canvas, info)
    }

    fn later_pages(&self, canvas: &mut Canvas, info: &PageInfo) {
        (self.later)(canvas, info)
    }
}

/// A template that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlankPages;

impl PageTemplate for BlankPages {
    fn first_page(&self, _canvas: &mut Canvas, _info: &PageInfo) {}
    fn later_pages(&self, _canvas: &mut Canvas, _info: &PageInfo) {}
}

/// The stock cover page and footer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefaultPages {
    pub config: TemplateConfig,
    logo: Option<Image>,
}

impl DefaultPages {
    /// Template for `config`, with its logo file decoded.
    pub fn new(config: TemplateConfig) -> anyhow::Result<Self> {
        let logo = config.logo.as_deref().map(Image::from_path).transpose()?;
        Ok(DefaultPages { config, logo })
    }

    /// Replace the logo.
    pub fn with_logo(mut self, logo: Image) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Draw the logo as large as fits in the box, centred.
    fn draw_logo(&self, canvas: &mut Canvas, x: f32, y: f32, width: f32, height: f32) {
        if let Some(logo) = &self.logo {
            let (w, h) = logo.fit(width, height);
            canvas.draw_image(logo, x + (width - w) / 2.0, y + (height - h) / 2.0, w, h);
        }
    }

    fn copyright(&self, date: NaiveDate) -> String {
        format!(
            "Copyright \u{a9} {} - {}, All Rights Reserved",
            date.format("%Y"),
            self.config.company
        )
    }
}

impl PageTemplate for DefaultPages {
    fn first_page(&self, canvas: &mut Canvas, info: &PageInfo) {
        let config = &self.config;
        canvas.save_state();

        self.draw_logo(canvas, 405.0, 720.0, 140.0, 60.0);

        canvas.set_fill_color(config.brand_color);
        canvas.set_font(Font::HelveticaBold, 22.0);
        canvas.draw_string(380.0, 620.0, &config.product);
        let product_width = canvas.string_width(&config.product);
        canvas.set_font(Font::Helvetica, 19.0);
        canvas.draw_string(380.0 + product_width + 8.0, 620.0, &config.product_line);

        canvas.set_stroke_color(config.accent_color);
        canvas.set_line_width(1.2);
        canvas.line(60.0, 610.0, 532.0, 610.0);

        canvas.set_fill_color(DOC_COLOR);
        canvas.set_font(Font::TimesBold, 25.0);
        let title = config.title.as_deref().unwrap_or(&info.title);
        canvas.draw_right_string(532.0, 500.0, title);

        canvas.set_font(Font::TimesRoman, 14.0);
        canvas.draw_right_string(532.0, 420.0, &info.date.format("%Y-%b-%d").to_string());

        canvas.set_fill_color(config.company_color);
        canvas.set_font(Font::TimesRoman, 8.0);
        canvas.draw_centred_string(296.0, 110.0, &config.company);

        canvas.set_fill_color(DOC_COLOR);
        canvas.set_font(Font::TimesBold, 8.0);
        canvas.draw_centred_string(296.0, 100.0, &config.confidentiality);

        canvas.set_font(Font::TimesRoman, 8.0);
        canvas.draw_centred_string(296.0, 90.0, &self.copyright(info.date));

        canvas.restore_state();
    }

    fn later_pages(&self, canvas: &mut Canvas, info: &PageInfo) {
        let config = &self.config;
        canvas.save_state();

        self.draw_logo(canvas, 500.0, 790.0, 70.0, 30.0);

        canvas.set_stroke_color(config.accent_color);
        canvas.set_line_width(0.8);
        canvas.line(60.0, 70.0, 532.0, 70.0);

        canvas.set_fill_color(DOC_COLOR);
        canvas.set_font(Font::TimesRoman, 10.0);
        canvas.draw_string(60.0, 55.0, &info.date.format("%Y-%m-%d").to_string());

        canvas.set_font(Font::TimesBold, 8.0);
        canvas.draw_centred_string(296.0, 60.0, &config.confidentiality);

        canvas.set_font(Font::TimesRoman, 8.0);
        canvas.draw_centred_string(296.0, 50.0, &self.copyright(info.date));

        canvas.set_font(Font::TimesRoman, 10.0);
        let page = format!("Page {}", canvas.page_number());
        canvas.draw_right_string(532.0, 55.0, &page);

        canvas.restore_state();
    }
}
