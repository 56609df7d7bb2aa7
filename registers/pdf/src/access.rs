// Licensed under the Apache-2.0 license

//! UVM access-mode strings for fields, registers and memories.

use registers_model::{AccessType, FieldNode, MemNode, OnReadType, OnWriteType, RegNode};

/// UVM access string for a field from its `sw`, `onread` and `onwrite`
/// properties.
///
/// Read-side and write-side effects are combined first (`W1SRC`, `W1CRS`,
/// ...), then write-side effects alone, then read-side effects alone.
pub fn field_access(
    sw: AccessType,
    onread: Option<OnReadType>,
    onwrite: Option<OnWriteType>,
) -> &'static str {
    use OnReadType::*;
    use OnWriteType::*;

    match sw {
        AccessType::Rw => match (onread, onwrite) {
            (None, None) => "RW",
            (Some(Rclr), Some(Woset)) => "W1SRC",
            (Some(Rclr), Some(Wzs)) => "W0SRC",
            (Some(Rclr), Some(Wset)) => "WSRC",
            (Some(Rset), Some(Woclr)) => "W1CRS",
            (Some(Rset), Some(Wzc)) => "W0CRS",
            (Some(Rset), Some(Wclr)) => "WCRS",
            (_, Some(Woclr)) => "W1C",
            (_, Some(Woset)) => "W1S",
            (_, Some(Wot)) => "W1T",
            (_, Some(Wzc)) => "W0C",
            (_, Some(Wzs)) => "W0S",
            (_, Some(Wzt)) => "W0T",
            (_, Some(Wclr)) => "WC",
            (_, Some(Wset)) => "WS",
            (Some(Rclr), _) => "WRC",
            (Some(Rset), _) => "WRS",
            _ => "RW",
        },
        AccessType::R => match onread {
            Some(Rclr) => "RC",
            Some(Rset) => "RS",
            _ => "RO",
        },
        AccessType::W => match onwrite {
            Some(Wclr) => "WOC",
            Some(Wset) => "WOS",
            _ => "WO",
        },
        AccessType::Rw1 => "W1",
        AccessType::W1 => "WO1",
        AccessType::Na => "NOACCESS",
    }
}

/// UVM access string of a field node.
pub fn get_field_access(field: &FieldNode) -> &'static str {
    field_access(field.sw, field.onread, field.onwrite)
}

/// Memory access: `R` when software can only read, `RW` otherwise.
pub fn get_mem_access(mem: &MemNode) -> &'static str {
    match mem.sw {
        AccessType::R => "R",
        _ => "RW",
    }
}

/// Register access in its map: the `regaccess_p` user property or `RW`.
pub fn get_reg_access(reg: &RegNode) -> &str {
    reg.regaccess_p.as_deref().unwrap_or("RW")
}

/// True when the field is a reserved placeholder (name contains `reserved`,
/// case-insensitive).
pub fn is_field_reserved(field: &FieldNode) -> bool {
    field.inst_name.to_ascii_lowercase().contains("reserved")
}
