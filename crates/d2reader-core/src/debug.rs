//! Memory inspection helpers for the CLI (`debug-tools` feature).
//!
//! ```text
//! 6FAB0000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use crate::memory::ModuleInfo;

const BYTES_PER_LINE: usize = 16;

/// Format one hexdump line starting at `address`
pub fn format_hexdump_line(address: u64, chunk: &[u8], ascii: bool) -> String {
    let mut line = format!("{:08X}: ", address);

    for j in 0..BYTES_PER_LINE {
        if j == BYTES_PER_LINE / 2 {
            line.push(' ');
        }
        match chunk.get(j) {
            Some(byte) => line.push_str(&format!("{:02X} ", byte)),
            None => line.push_str("   "),
        }
    }

    if ascii {
        line.push_str(" |");
        for j in 0..BYTES_PER_LINE {
            line.push(match chunk.get(j) {
                Some(byte) if (0x20..0x7F).contains(byte) => *byte as char,
                Some(_) => '.',
                None => ' ',
            });
        }
        line.push('|');
    }

    line.trim_end().to_string()
}

/// Format `bytes` read from `address` as hexdump lines
pub fn hexdump(address: u64, bytes: &[u8], ascii: bool) -> Vec<String> {
    bytes
        .chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(i, chunk)| {
            format_hexdump_line(address + (i * BYTES_PER_LINE) as u64, chunk, ascii)
        })
        .collect()
}

/// Absolute address of `offset` inside the module called `name`
pub fn module_address(modules: &[ModuleInfo], name: &str, offset: u64) -> Option<u64> {
    modules
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .map(|m| m.base_address + offset)
}
