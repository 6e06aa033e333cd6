//! CLI command implementations.

pub mod builds;
pub mod hex_utils;
pub mod hexdump;
pub mod hovered;
pub mod stats;
pub mod status;
pub mod string;
pub mod track;

use anyhow::{Result, bail};
use d2reader_core::{D2Reader, MemoryReader, ProcessHandle, attach};

use crate::config::Config;
use crate::retry::open_process;

/// Open the game process once, without retrying
pub fn open(config: &Config, pid: Option<u32>) -> Result<ProcessHandle> {
    let process = open_process(pid, &config.process_names())?;
    eprintln!(
        "Found {} (PID: {}, Base: 0x{:X})",
        process.name, process.pid, process.base_address
    );
    Ok(process)
}

/// Attach a reader session, failing if the build is not supported
pub fn open_session(process: &ProcessHandle) -> Result<D2Reader<MemoryReader<'_>>> {
    let session = attach(process)?;
    if !session.is_supported() {
        bail!("Build {} is not supported", session.build());
    }
    Ok(session)
}
