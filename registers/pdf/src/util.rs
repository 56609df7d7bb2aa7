// Licensed under the Apache-2.0 license

//! Utility functions for name rendering and number formatting.
//!
//! Addresses and reset values are printed as Verilog-style sized literals
//! with underscore-grouped hex digits (`32'h0000_1A00`), sizes as `0x`
//! constants.

use crate::config::NameCase;

/// Groups `digits` in fours from the right with `_` separators.
fn group_digits(digits: &str) -> String {
    let mut x = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i % 4 == 0 && i != 0 {
            x.push('_');
        }
        x.push(c);
    }
    x.chars().rev().collect()
}

/// Formats `value` as a sized hex literal of `width` bits.
///
/// The digit count is `ceil(width / 4)`, zero padded; values that do not fit
/// print all of their digits.
///
/// # Examples
/// ```
/// use registers_pdf::util::sized_hex;
/// assert_eq!(sized_hex(0x1a00, 32), "32'h0000_1A00");
/// assert_eq!(sized_hex(5, 3), "3'h5");
/// ```
pub fn sized_hex(value: u64, width: u32) -> String {
    let nibbles = width.max(1).div_ceil(4) as usize;
    let digits = format!("{value:0nibbles$X}");
    format!("{width}'h{}", group_digits(&digits))
}

/// Formats an address for the given address bus width.
///
/// # Examples
/// ```
/// use registers_pdf::util::format_address;
/// assert_eq!(format_address(0, 32), "32'h0000_0000");
/// assert_eq!(format_address(0x4000_0010, 64), "64'h0000_0000_4000_0010");
/// ```
pub fn format_address(address: u64, address_width: u32) -> String {
    sized_hex(address, address_width)
}

/// Formats a reset value of a field or register `width` bits wide.
pub fn format_reset(value: u64, width: u32) -> String {
    sized_hex(value, width)
}

/// Formats an integer as a hex constant with underscores for readability.
///
/// Values <= 9 are formatted as decimal; larger values use hex with
/// underscore separators every 4 digits.
///
/// # Examples
/// ```
/// use registers_pdf::util::hex_const;
/// assert_eq!(hex_const(5), "5");
/// assert_eq!(hex_const(0x1234), "0x1234");
/// assert_eq!(hex_const(0x12345678), "0x1234_5678");
/// ```
pub fn hex_const(val: u64) -> String {
    if val > 9 {
        "0x".to_string() + &group_digits(&format!("{val:x}"))
    } else {
        format!("{val}")
    }
}

/// Rounds `x` up to the nearest multiple of `n`.
pub fn roundup_to(x: u64, n: u64) -> u64 {
    if n == 0 {
        return x;
    }
    x.div_ceil(n) * n
}

/// Rounds `x` up to the next power of two.
pub fn roundup_pow2(x: u64) -> u64 {
    x.max(1).next_power_of_two()
}

/// Renders an instance name in the configured case.
pub fn inst_name(name: &str, case: NameCase) -> String {
    match case {
        NameCase::Upper => name.to_uppercase(),
        NameCase::Lower => name.to_lowercase(),
    }
}

/// Appends `[n]` suffixes for each array dimension.
pub fn array_suffix(dimensions: &[u64]) -> String {
    dimensions.iter().map(|d| format!("[{d}]")).collect()
}

/// Destination name of the section for the instance at `path`.
///
/// Array brackets are dropped so names stay plain PDF name tokens.
pub fn anchor_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(".")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// Collapses all whitespace runs (including newlines) into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_name() {
        assert_eq!(anchor_name(&["top", "ctrl"]), "top.ctrl");
        assert_eq!(anchor_name(&["top", "data[4]"]), "top.data_4_");
        assert_eq!(anchor_name::<&str>(&[]), "");
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0, 32), "32'h0000_0000");
        assert_eq!(format_address(0xdead_beef, 32), "32'hDEAD_BEEF");
        assert_eq!(format_address(0x10, 64), "64'h0000_0000_0000_0010");
        assert_eq!(format_address(0x10, 16), "16'h0010");
        assert_eq!(format_address(0x3, 8), "8'h03");
        // Too wide for the bus: every digit is kept
        assert_eq!(format_address(0x1_0000_0000, 32), "32'h1_0000_0000");
    }

    #[test]
    fn test_format_reset() {
        assert_eq!(format_reset(0, 1), "1'h0");
        assert_eq!(format_reset(0xa, 4), "4'hA");
        assert_eq!(format_reset(0x1f, 5), "5'h1F");
        assert_eq!(format_reset(0xa1, 32), "32'h0000_00A1");
    }

    #[test]
    fn test_hex_const() {
        assert_eq!(hex_const(0), "0");
        assert_eq!(hex_const(9), "9");
        assert_eq!(hex_const(10), "0xa");
        assert_eq!(hex_const(0x1234), "0x1234");
        assert_eq!(hex_const(0x12345678), "0x1234_5678");
    }

    #[test]
    fn test_roundup() {
        assert_eq!(roundup_to(5, 4), 8);
        assert_eq!(roundup_to(8, 4), 8);
        assert_eq!(roundup_to(0, 4), 0);
        assert_eq!(roundup_pow2(5), 8);
        assert_eq!(roundup_pow2(8), 8);
        assert_eq!(roundup_pow2(0), 1);
    }

    #[test]
    fn test_names() {
        assert_eq!(inst_name("Ctrl_Reg", NameCase::Upper), "CTRL_REG");
        assert_eq!(inst_name("Ctrl_Reg", NameCase::Lower), "ctrl_reg");
        assert_eq!(array_suffix(&[2, 3]), "[2][3]");
        assert_eq!(collapse_whitespace("  a\n b\t\tc "), "a b c");
    }
}
