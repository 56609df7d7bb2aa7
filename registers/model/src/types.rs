// Licensed under the Apache-2.0 license

//! Elaborated register model.
//!
//! Every node here is fully elaborated: parameters are resolved, array
//! dimensions are known and every addressable node carries its offset relative
//! to its parent. The tree is produced by an external SystemRDL compiler and
//! handed over either as Rust values or as a serialized file (see
//! [`crate::load`]).
//!
//! ```text
//! RootNode
//! └── AddrMapNode            # top-level map(s)
//!     ├── RegNode            # register with fields
//!     │   └── FieldNode
//!     ├── RegFileNode        # group of registers / nested regfiles
//!     ├── MemNode            # memory region
//!     └── AddrMapNode        # nested map
//! ```

use serde::{Deserialize, Serialize};

/// Default register width in bits when the model omits `regwidth`.
pub const DEFAULT_REGWIDTH: u32 = 32;

//=============================================================================
// Property enums
//=============================================================================

/// Software / hardware access (`sw` and `hw` properties).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    #[default]
    Rw,
    R,
    W,
    Rw1,
    W1,
    Na,
}

/// Side effect of a software read (`onread` property).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnReadType {
    Rclr,
    Rset,
    Ruser,
}

/// Side effect of a software write (`onwrite` property).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnWriteType {
    Woset,
    Woclr,
    Wot,
    Wzs,
    Wzc,
    Wzt,
    Wclr,
    Wset,
    Wuser,
}

//=============================================================================
// Arrays
//=============================================================================

/// Array dimensions and stride of an addressable instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayInfo {
    /// Dimensions, outermost first (`[2][3]` is `[2, 3]`).
    pub dimensions: Vec<u64>,
    /// Byte distance between consecutive elements.
    #[serde(deserialize_with = "de::u64_or_hex")]
    pub stride: u64,
}

impl ArrayInfo {
    /// Total number of elements.
    pub fn n_elements(&self) -> u64 {
        self.dimensions.iter().fold(1, |acc, &d| acc.saturating_mul(d))
    }
}

//=============================================================================
// Nodes
//=============================================================================

/// Root of an elaborated design. Holds the top-level address maps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootNode {
    pub top: Vec<AddrMapNode>,
}

/// Any addressable node that can be a child of an addrmap or regfile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    AddrMap(AddrMapNode),
    RegFile(RegFileNode),
    Reg(RegNode),
    Mem(MemNode),
}

/// An address map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AddrMapNode {
    pub inst_name: String,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "de::u64_or_hex")]
    pub address_offset: u64,
    #[serde(default)]
    pub array: Option<ArrayInfo>,
    #[serde(default)]
    pub children: Vec<Node>,
    /// User property: absolute base address of the block.
    #[serde(default, deserialize_with = "de::opt_u64_or_hex")]
    pub base_address_p: Option<u64>,
    /// User property: address bus width in bits.
    #[serde(default)]
    pub address_width_p: Option<u32>,
    /// User property: map name used in the generated documentation.
    #[serde(default)]
    pub map_name_p: Option<String>,
    #[serde(default)]
    pub bigendian: bool,
    #[serde(default)]
    pub littleendian: bool,
}

/// A register file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegFileNode {
    pub inst_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "de::u64_or_hex")]
    pub address_offset: u64,
    #[serde(default)]
    pub array: Option<ArrayInfo>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A register.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegNode {
    pub inst_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "de::u64_or_hex")]
    pub address_offset: u64,
    /// Register width in bits.
    #[serde(default = "default_regwidth")]
    pub regwidth: u32,
    /// Bus access width in bits, defaults to `regwidth`.
    #[serde(default)]
    pub accesswidth: Option<u32>,
    #[serde(default)]
    pub array: Option<ArrayInfo>,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    /// User property: UVM access of the register in its map.
    #[serde(default)]
    pub regaccess_p: Option<String>,
}

impl Default for RegNode {
    fn default() -> Self {
        Self {
            inst_name: String::new(),
            name: None,
            desc: None,
            address_offset: 0,
            regwidth: DEFAULT_REGWIDTH,
            accesswidth: None,
            array: None,
            fields: vec![],
            regaccess_p: None,
        }
    }
}

/// A bit field within a register.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldNode {
    pub inst_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    pub lsb: u32,
    pub msb: u32,
    #[serde(default)]
    pub sw: AccessType,
    #[serde(default)]
    pub hw: AccessType,
    #[serde(default)]
    pub onread: Option<OnReadType>,
    #[serde(default)]
    pub onwrite: Option<OnWriteType>,
    #[serde(default, deserialize_with = "de::opt_u64_or_hex")]
    pub reset: Option<u64>,
}

/// A memory region.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemNode {
    pub inst_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, deserialize_with = "de::u64_or_hex")]
    pub address_offset: u64,
    pub mementries: u64,
    /// Entry width in bits.
    pub memwidth: u32,
    #[serde(default)]
    pub sw: AccessType,
    #[serde(default)]
    pub array: Option<ArrayInfo>,
}

fn default_regwidth() -> u32 {
    DEFAULT_REGWIDTH
}

//=============================================================================
// Sizes and common accessors
//=============================================================================

fn total_size(size: u64, array: Option<&ArrayInfo>) -> u64 {
    // Arrays span stride * elements, even when the last element is shorter
    // than the stride.
    match array {
        Some(array) => array.stride.saturating_mul(array.n_elements()),
        None => size,
    }
}

fn span(children: &[Node]) -> u64 {
    children
        .iter()
        .map(|c| c.address_offset().saturating_add(c.total_size()))
        .max()
        .unwrap_or(0)
}

impl AddrMapNode {
    /// Size in bytes of a single element.
    pub fn size(&self) -> u64 {
        span(&self.children)
    }

    pub fn total_size(&self) -> u64 {
        total_size(self.size(), self.array.as_ref())
    }

    /// The `name` property, falling back to the instance name.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.inst_name)
    }
}

impl RegFileNode {
    pub fn size(&self) -> u64 {
        span(&self.children)
    }

    pub fn total_size(&self) -> u64 {
        total_size(self.size(), self.array.as_ref())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.inst_name)
    }
}

impl RegNode {
    /// Size in bytes of a single register.
    pub fn size(&self) -> u64 {
        u64::from(self.regwidth).div_ceil(8)
    }

    pub fn total_size(&self) -> u64 {
        total_size(self.size(), self.array.as_ref())
    }

    pub fn accesswidth(&self) -> u32 {
        self.accesswidth.unwrap_or(self.regwidth)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.inst_name)
    }

    /// Reset value of the whole register assembled from its fields.
    ///
    /// Fields without a reset value contribute zeros.
    pub fn reset_value(&self) -> u64 {
        self.fields
            .iter()
            .filter_map(|f| f.reset.and_then(|r| (r & f.mask()).checked_shl(f.lsb)))
            .fold(0, |acc, v| acc | v)
    }

    /// Fields ordered MSB first.
    pub fn fields_msb_first(&self) -> Vec<&FieldNode> {
        let mut fields: Vec<_> = self.fields.iter().collect();
        fields.sort_by(|a, b| b.lsb.cmp(&a.lsb));
        fields
    }
}

impl FieldNode {
    /// Width in bits.
    pub fn width(&self) -> u32 {
        self.msb.saturating_sub(self.lsb) + 1
    }

    /// Mask of the field value, not shifted.
    pub fn mask(&self) -> u64 {
        if self.width() >= 64 {
            u64::MAX
        } else {
            (1u64 << self.width()) - 1
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.inst_name)
    }
}

impl MemNode {
    pub fn size(&self) -> u64 {
        self.mementries
            .saturating_mul(u64::from(self.memwidth).div_ceil(8))
    }

    pub fn total_size(&self) -> u64 {
        total_size(self.size(), self.array.as_ref())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.inst_name)
    }
}

impl Node {
    pub fn inst_name(&self) -> &str {
        match self {
            Node::AddrMap(n) => &n.inst_name,
            Node::RegFile(n) => &n.inst_name,
            Node::Reg(n) => &n.inst_name,
            Node::Mem(n) => &n.inst_name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Node::AddrMap(n) => n.display_name(),
            Node::RegFile(n) => n.display_name(),
            Node::Reg(n) => n.display_name(),
            Node::Mem(n) => n.display_name(),
        }
    }

    pub fn desc(&self) -> Option<&str> {
        match self {
            Node::AddrMap(n) => n.desc.as_deref(),
            Node::RegFile(n) => n.desc.as_deref(),
            Node::Reg(n) => n.desc.as_deref(),
            Node::Mem(n) => n.desc.as_deref(),
        }
    }

    /// Byte offset relative to the parent.
    pub fn address_offset(&self) -> u64 {
        match self {
            Node::AddrMap(n) => n.address_offset,
            Node::RegFile(n) => n.address_offset,
            Node::Reg(n) => n.address_offset,
            Node::Mem(n) => n.address_offset,
        }
    }

    pub fn array(&self) -> Option<&ArrayInfo> {
        match self {
            Node::AddrMap(n) => n.array.as_ref(),
            Node::RegFile(n) => n.array.as_ref(),
            Node::Reg(n) => n.array.as_ref(),
            Node::Mem(n) => n.array.as_ref(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Node::AddrMap(n) => n.size(),
            Node::RegFile(n) => n.size(),
            Node::Reg(n) => n.size(),
            Node::Mem(n) => n.size(),
        }
    }

    pub fn total_size(&self) -> u64 {
        match self {
            Node::AddrMap(n) => n.total_size(),
            Node::RegFile(n) => n.total_size(),
            Node::Reg(n) => n.total_size(),
            Node::Mem(n) => n.total_size(),
        }
    }

    /// Child nodes for group-like nodes, empty for registers and memories.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::AddrMap(n) => &n.children,
            Node::RegFile(n) => &n.children,
            Node::Reg(_) | Node::Mem(_) => &[],
        }
    }
}

//=============================================================================
// Serde helpers
//=============================================================================

pub(crate) mod de {
    //! Integers in hand-written model files may be given as numbers or as
    //! `0x`-prefixed strings (underscores allowed).

    use serde::{de::Error, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(u64),
        String(String),
    }

    fn parse<E: Error>(v: IntOrString) -> Result<u64, E> {
        match v {
            IntOrString::Int(i) => Ok(i),
            IntOrString::String(s) => parse_int(&s).map_err(E::custom),
        }
    }

    pub fn parse_int(s: &str) -> Result<u64, String> {
        let cleaned = s.trim().replace('_', "");
        let parsed = if let Some(hex) = cleaned
            .strip_prefix("0x")
            .or_else(|| cleaned.strip_prefix("0X"))
        {
            u64::from_str_radix(hex, 16)
        } else {
            cleaned.parse::<u64>()
        };
        parsed.map_err(|e| format!("invalid integer {s:?}: {e}"))
    }

    pub fn u64_or_hex<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        parse(IntOrString::deserialize(d)?)
    }

    pub fn opt_u64_or_hex<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        match Option::<IntOrString>::deserialize(d)? {
            Some(v) => parse(v).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, lsb: u32, msb: u32, reset: Option<u64>) -> FieldNode {
        FieldNode {
            inst_name: name.into(),
            lsb,
            msb,
            reset,
            ..Default::default()
        }
    }

    #[test]
    fn test_reg_size_and_reset() {
        let reg = RegNode {
            inst_name: "ctrl".into(),
            fields: vec![
                field("en", 0, 0, Some(1)),
                field("mode", 4, 7, Some(0xa)),
                field("unreset", 8, 15, None),
            ],
            ..Default::default()
        };
        assert_eq!(reg.size(), 4);
        assert_eq!(reg.reset_value(), 0xa1);
        let names: Vec<_> = reg
            .fields_msb_first()
            .iter()
            .map(|f| f.inst_name.as_str())
            .collect();
        assert_eq!(names, ["unreset", "mode", "en"]);
    }

    #[test]
    fn test_array_total_size() {
        let reg = RegNode {
            inst_name: "data".into(),
            array: Some(ArrayInfo {
                dimensions: vec![2, 3],
                stride: 8,
            }),
            ..Default::default()
        };
        assert_eq!(reg.size(), 4);
        assert_eq!(reg.total_size(), 48);
    }

    #[test]
    fn test_block_size_is_span() {
        let map = AddrMapNode {
            inst_name: "top".into(),
            children: vec![
                Node::Reg(RegNode {
                    inst_name: "a".into(),
                    address_offset: 0x10,
                    ..Default::default()
                }),
                Node::Mem(MemNode {
                    inst_name: "sram".into(),
                    address_offset: 0x100,
                    mementries: 64,
                    memwidth: 32,
                    ..Default::default()
                }),
            ],
            ..Default::default()
        };
        assert_eq!(map.size(), 0x200);
        assert_eq!(AddrMapNode::default().size(), 0);
    }

    #[test]
    fn test_sizes_saturate_on_unvalidated_input() {
        let reg = RegNode {
            inst_name: "wide".into(),
            regwidth: 128,
            address_offset: u64::MAX - 3,
            fields: vec![field("hi", 64, 71, Some(1)), field("lo", 0, 0, Some(1))],
            array: Some(ArrayInfo {
                dimensions: vec![u64::MAX, 2],
                stride: 16,
            }),
            ..Default::default()
        };
        assert_eq!(reg.reset_value(), 1);
        assert_eq!(reg.total_size(), u64::MAX);
        assert_eq!(span(&[Node::Reg(reg)]), u64::MAX);
    }

    #[test]
    fn test_field_mask() {
        assert_eq!(field("f", 0, 63, None).mask(), u64::MAX);
        assert_eq!(field("f", 3, 5, None).mask(), 0b111);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(de::parse_int("0x1000_0000"), Ok(0x1000_0000));
        assert_eq!(de::parse_int("42"), Ok(42));
        assert!(de::parse_int("0xzz").is_err());
    }
}
