//! Raw memory dump.
//!
//! ```text
//! 6FAB0000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use anyhow::{Context, Result};
use d2reader_core::{MemoryReader, ReadMemory, hexdump, module_address};

use super::hex_utils::{parse_hex_address, parse_size};
use crate::config::Config;

pub fn run(
    config: &Config,
    pid: Option<u32>,
    address: &str,
    size: &str,
    module: Option<&str>,
    ascii: bool,
) -> Result<()> {
    let offset = parse_hex_address(address)?;
    let size = parse_size(size)?;
    let process = super::open(config, pid)?;

    let address = match module {
        Some(name) => module_address(&process.modules()?, name, offset)
            .with_context(|| format!("Module {} is not loaded", name))?,
        None => offset,
    };

    let reader = MemoryReader::new(&process);
    let bytes = reader.read_bytes(address, size)?;

    println!("Hexdump at 0x{:X} ({} bytes):", address, size);
    println!();
    for line in hexdump(address, &bytes, ascii) {
        println!("{}", line);
    }
    Ok(())
}
