// Licensed under the Apache-2.0 license

//! Loading serialized elaborated models.
//!
//! The exporter does not compile SystemRDL. An external compiler elaborates the
//! design and dumps the resulting tree; this module reads such a dump back.
//! The format is picked from the file extension.

use crate::types::RootNode;
use anyhow::{bail, Context};
use std::path::Path;

/// Serialization format of an elaborated model file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Hjson,
    Toml,
}

impl ModelFormat {
    /// Pick a format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(ModelFormat::Json),
            Some("hjson") => Ok(ModelFormat::Hjson),
            Some("toml") => Ok(ModelFormat::Toml),
            _ => bail!(
                "cannot determine model format of {} (expected .json, .hjson or .toml)",
                path.display()
            ),
        }
    }
}

impl RootNode {
    /// Load and validate a model file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let format = ModelFormat::from_path(path)?;
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let root = Self::from_str_with_format(&src, format)
            .with_context(|| format!("failed to load model from {}", path.display()))?;
        log::debug!(
            "Loaded {} top-level addrmap(s) from {}",
            root.top.len(),
            path.display()
        );
        Ok(root)
    }

    /// Parse and validate a model in the given format.
    pub fn from_str_with_format(src: &str, format: ModelFormat) -> anyhow::Result<Self> {
        let root: RootNode = match format {
            ModelFormat::Json => serde_json::from_str(src)?,
            ModelFormat::Hjson => serde_hjson::from_str(src)?,
            ModelFormat::Toml => toml::from_str(src)?,
        };
        root.validate()?;
        Ok(root)
    }

    pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
        Self::from_str_with_format(src, ModelFormat::Json)
    }

    pub fn from_hjson_str(src: &str) -> anyhow::Result<Self> {
        Self::from_str_with_format(src, ModelFormat::Hjson)
    }

    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        Self::from_str_with_format(src, ModelFormat::Toml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccessType, Node, OnWriteType};
    use std::io::Write;

    const JSON: &str = r#"{
        "top": [{
            "inst_name": "uart",
            "name": "UART Controller",
            "base_address_p": "0x4000_0000",
            "children": [
                {
                    "type": "reg",
                    "inst_name": "ctrl",
                    "address_offset": 0,
                    "fields": [
                        { "inst_name": "en", "lsb": 0, "msb": 0, "reset": 0 },
                        { "inst_name": "irq", "lsb": 1, "msb": 1, "onwrite": "woclr" }
                    ]
                },
                {
                    "type": "mem",
                    "inst_name": "fifo",
                    "address_offset": "0x100",
                    "mementries": 16,
                    "memwidth": 32,
                    "sw": "r"
                }
            ]
        }]
    }"#;

    #[test]
    fn test_json() {
        let root = RootNode::from_json_str(JSON).unwrap();
        let top = &root.top[0];
        assert_eq!(top.base_address_p, Some(0x4000_0000));
        assert_eq!(top.children.len(), 2);
        let Node::Reg(reg) = &top.children[0] else {
            panic!("expected a register");
        };
        assert_eq!(reg.regwidth, 32);
        assert_eq!(reg.fields[1].onwrite, Some(OnWriteType::Woclr));
        assert_eq!(reg.fields[1].sw, AccessType::Rw);
        let Node::Mem(mem) = &top.children[1] else {
            panic!("expected a memory");
        };
        assert_eq!(mem.address_offset, 0x100);
        assert_eq!(mem.sw, AccessType::R);
    }

    #[test]
    fn test_hjson() {
        let src = r#"
        {
          top: [
            {
              inst_name: dma
              children: [
                {
                  type: reg
                  inst_name: status
                  fields: [
                    {
                      inst_name: busy
                      lsb: 0
                      msb: 0
                      sw: r
                    }
                  ]
                }
              ]
            }
          ]
        }
        "#;
        let root = RootNode::from_hjson_str(src).unwrap();
        assert_eq!(root.top[0].inst_name, "dma");
        assert_eq!(root.top[0].children[0].inst_name(), "status");
    }

    #[test]
    fn test_toml() {
        let src = r#"
[[top]]
inst_name = "gpio"
address_width_p = 64

[[top.children]]
type = "reg"
inst_name = "dir"
address_offset = 8

[[top.children.fields]]
inst_name = "pins"
lsb = 0
msb = 31
"#;
        let root = RootNode::from_toml_str(src).unwrap();
        assert_eq!(root.top[0].address_width_p, Some(64));
        assert_eq!(root.top[0].children[0].address_offset(), 8);
    }

    #[test]
    fn test_from_path_picks_format() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(JSON.as_bytes()).unwrap();
        let root = RootNode::from_path(file.path()).unwrap();
        assert_eq!(root.top[0].inst_name, "uart");

        let err = RootNode::from_path(Path::new("design.rdl")).unwrap_err();
        assert!(err.to_string().contains("cannot determine model format"));
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        let src = r#"{ "top": [{ "inst_name": "m", "children": [
            { "type": "reg", "inst_name": "r", "fields": [ { "inst_name": "f", "lsb": 30, "msb": 33 } ] }
        ] }] }"#;
        let err = RootNode::from_json_str(src).unwrap_err();
        assert!(format!("{err:#}").contains("m.r.f"));
    }
}
