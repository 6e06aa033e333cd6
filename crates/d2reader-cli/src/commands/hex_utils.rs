//! Number parsing for command arguments.

use anyhow::{Context, Result};

/// Parse a hex address, with or without `0x` prefix
pub fn parse_hex_address(s: &str) -> Result<u64> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(digits, 16).with_context(|| format!("Invalid hex address: {}", s))
}

/// Parse a size: decimal, or hex with a `0x` prefix
pub fn parse_size(s: &str) -> Result<usize> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.with_context(|| format!("Invalid size: {}", s))
}
