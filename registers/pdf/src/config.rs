// Licensed under the Apache-2.0 license

//! Configuration for document rendering.
//!
//! This module provides [`NameCase`], which controls how instance names are
//! printed, [`ExportSettings`], the serializable subset of the exporter
//! options, and [`TemplateConfig`], which parameterizes the stock cover and
//! footer pages.
//!
//! Both serializable types reject unknown keys, so a misspelled option is an
//! error rather than being silently ignored.

use crate::style::Color;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Case used when rendering instance names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameCase {
    #[default]
    Upper,
    Lower,
}

impl NameCase {
    pub fn from_uppercase_flag(uppercase: bool) -> Self {
        if uppercase {
            NameCase::Upper
        } else {
            NameCase::Lower
        }
    }
}

/// Exporter options that can be read from a TOML file.
///
/// # Example
///
/// ```
/// use registers_pdf::config::ExportSettings;
///
/// let settings = ExportSettings::from_toml_str("use_uppercase_inst_name = false").unwrap();
/// assert_eq!(settings.use_uppercase_inst_name, Some(false));
///
/// // Unknown keys are rejected
/// assert!(ExportSettings::from_toml_str("use_upercase = true").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSettings {
    /// Render instance names in uppercase (default) or lowercase.
    pub use_uppercase_inst_name: Option<bool>,
    /// Document title used in the PDF metadata and the cover page.
    pub title: Option<String>,
    /// Date printed on the pages instead of today's date.
    pub date: Option<NaiveDate>,
    /// Compress content streams.
    pub compress: Option<bool>,
}

impl ExportSettings {
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        toml::from_str(src).context("invalid exporter options")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("in {}", path.display()))
    }
}

/// Text and colours of the stock page template.
///
/// # Example
///
/// ```
/// use registers_pdf::config::TemplateConfig;
///
/// let config = TemplateConfig::from_toml_str(r##"
/// company = "Acme Semiconductors"
/// accent_color = "#004080"
/// "##).unwrap();
/// assert_eq!(config.company, "Acme Semiconductors");
/// assert_eq!(config.product, "Example");
/// assert_eq!(config.title, None);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Company name in the cover footer and copyright lines.
    pub company: String,
    /// Product name, printed bold on the cover.
    pub product: String,
    /// Product line printed after the product name.
    pub product_line: String,
    /// Cover page title. The document title is used when this is unset.
    pub title: Option<String>,
    /// PNG or JPEG drawn at the top right of the cover and of every later
    /// page. Relative paths loaded by [`TemplateConfig::from_path`] are
    /// relative to the template file.
    pub logo: Option<PathBuf>,
    /// Confidentiality notice in every footer.
    pub confidentiality: String,
    /// Colour of the product name.
    pub brand_color: Color,
    /// Colour of the horizontal rules.
    pub accent_color: Color,
    /// Colour of the company name on the cover.
    pub company_color: Color,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            company: "Example Corporation".into(),
            product: "Example".into(),
            product_line: "FPGA".into(),
            title: None,
            logo: None,
            confidentiality: "Proprietary and Confidential".into(),
            brand_color: Color::from_hex(0x18325e),
            accent_color: Color::from_hex(0x4d82bb),
            company_color: Color::RED,
        }
    }
}

impl TemplateConfig {
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        toml::from_str(src).context("invalid page template")
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config =
            Self::from_toml_str(&src).with_context(|| format!("in {}", path.display()))?;
        if let Some(dir) = path.parent() {
            config.logo = config.logo.take().map(|logo| dir.join(logo));
        }
        Ok(config)
    }
}
