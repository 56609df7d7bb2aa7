// Licensed under the Apache-2.0 license

//! The PDF exporter entry point.
//!
//! ```no_run
//! use registers_model::RootNode;
//! use registers_pdf::{ExportOptions, PdfExporter};
//! use std::path::Path;
//!
//! let root = RootNode::from_path(Path::new("soc.json")).unwrap();
//! let exporter = PdfExporter::new(ExportOptions::default().use_uppercase_inst_name(false));
//! exporter.export(&root, Path::new("soc.pdf")).unwrap();
//! ```

use crate::config::{ExportSettings, NameCase};
use crate::document::Document;
use crate::layout::{layout_addrmap, layout_root};
use crate::markup::{DescriptionRenderer, PlainText};
use crate::output::GeneratedDocument;
use crate::pages::{DefaultPages, PageTemplate};
use crate::pdf::PdfWriter;
use crate::style::StyleSheet;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use registers_model::{AddrMapNode, RootNode};
use std::io::Write;
use std::path::Path;

/// Options of a [`PdfExporter`].
pub struct ExportOptions {
    /// Render instance names in uppercase (default) or lowercase.
    pub use_uppercase_inst_name: bool,
    /// Document title; defaults to the name of the first address map.
    pub title: Option<String>,
    /// Date printed by the page template; defaults to today.
    pub date: Option<NaiveDate>,
    /// Compress content streams.
    pub compress: bool,
    /// Decorations of the first and later pages.
    pub page_template: Box<dyn PageTemplate>,
    /// Rendering of `desc` properties.
    pub description_renderer: Box<dyn DescriptionRenderer>,
    pub styles: StyleSheet,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            use_uppercase_inst_name: true,
            title: None,
            date: None,
            compress: true,
            page_template: Box::new(DefaultPages::default()),
            description_renderer: Box::new(PlainText),
            styles: StyleSheet::default(),
        }
    }
}

impl ExportOptions {
    /// Options from settings read from a file; unset keys keep their
    /// defaults.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self::default().apply(settings)
    }

    /// Parse options from TOML. Unknown keys are an error.
    ///
    /// ```
    /// use registers_pdf::ExportOptions;
    ///
    /// let options = ExportOptions::from_toml_str("use_uppercase_inst_name = false").unwrap();
    /// assert!(!options.use_uppercase_inst_name);
    /// assert!(ExportOptions::from_toml_str("uppercase = false").is_err());
    /// ```
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        Ok(Self::from_settings(&ExportSettings::from_toml_str(src)?))
    }

    /// Override the options set in `settings`.
    pub fn apply(mut self, settings: &ExportSettings) -> Self {
        if let Some(uppercase) = settings.use_uppercase_inst_name {
            self.use_uppercase_inst_name = uppercase;
        }
        if let Some(title) = &settings.title {
            self.title = Some(title.clone());
        }
        if let Some(date) = settings.date {
            self.date = Some(date);
        }
        if let Some(compress) = settings.compress {
            self.compress = compress;
        }
        self
    }

    pub fn use_uppercase_inst_name(mut self, uppercase: bool) -> Self {
        self.use_uppercase_inst_name = uppercase;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn page_template(mut self, template: impl PageTemplate + 'static) -> Self {
        self.page_template = Box::new(template);
        self
    }

    pub fn description_renderer(mut self, renderer: impl DescriptionRenderer + 'static) -> Self {
        self.description_renderer = Box::new(renderer);
        self
    }

    pub fn styles(mut self, styles: StyleSheet) -> Self {
        self.styles = styles;
        self
    }

    fn name_case(&self) -> NameCase {
        NameCase::from_uppercase_flag(self.use_uppercase_inst_name)
    }
}

/// What to export: a whole design or a single address map.
#[derive(Clone, Copy, Debug)]
pub enum ExportNode<'a> {
    Root(&'a RootNode),
    AddrMap(&'a AddrMapNode),
}

impl<'a> From<&'a RootNode> for ExportNode<'a> {
    fn from(root: &'a RootNode) -> Self {
        ExportNode::Root(root)
    }
}

impl<'a> From<&'a AddrMapNode> for ExportNode<'a> {
    fn from(map: &'a AddrMapNode) -> Self {
        ExportNode::AddrMap(map)
    }
}

/// Renders elaborated register models as PDF specifications.
#[derive(Default)]
pub struct PdfExporter {
    options: ExportOptions,
}

impl PdfExporter {
    pub fn new(options: ExportOptions) -> Self {
        PdfExporter { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Validate `node` and lay out its sections.
    pub fn layout<'a>(&self, node: impl Into<ExportNode<'a>>) -> anyhow::Result<GeneratedDocument> {
        let case = self.options.name_case();
        let mut generated = match node.into() {
            ExportNode::Root(root) => {
                if root.top.is_empty() {
                    bail!("nothing to export: the model has no address map");
                }
                root.validate().context("invalid register model")?;
                layout_root(root, case)
            }
            ExportNode::AddrMap(map) => {
                map.validate().context("invalid register model")?;
                layout_addrmap(map, case)
            }
        };
        if let Some(title) = &self.options.title {
            generated.title = title.clone();
        }
        Ok(generated)
    }

    /// Convert laid-out sections into document flowables.
    pub fn build_document(&self, generated: &GeneratedDocument) -> Document {
        generated.to_document(self.options.description_renderer.as_ref())
    }

    fn writer(&self) -> PdfWriter<'_> {
        PdfWriter {
            styles: &self.options.styles,
            template: self.options.page_template.as_ref(),
            date: self
                .options
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            compress: self.options.compress,
        }
    }

    /// Write the PDF for `node` to `out`.
    pub fn export_to_writer<'a, W: Write>(
        &self,
        node: impl Into<ExportNode<'a>>,
        out: &mut W,
    ) -> anyhow::Result<()> {
        let generated = self.layout(node)?;
        let doc = self.build_document(&generated);
        log::debug!(
            "Rendering {} section(s) into {} flowable(s)",
            generated.sections.len(),
            doc.flowables.len()
        );
        self.writer().write(&doc, out)
    }

    /// The PDF for `node` as bytes.
    pub fn render<'a>(&self, node: impl Into<ExportNode<'a>>) -> anyhow::Result<Vec<u8>> {
        let mut bytes = vec![];
        self.export_to_writer(node, &mut bytes)?;
        Ok(bytes)
    }

    /// Write the PDF for `node` to the file at `path`.
    pub fn export<'a>(&self, node: impl Into<ExportNode<'a>>, path: &Path) -> anyhow::Result<()> {
        let bytes = self.render(node)?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Write the PDF for a single address map.
    pub fn export_addrmap(&self, map: &AddrMapNode, path: &Path) -> anyhow::Result<()> {
        self.export(map, path)
    }
}
