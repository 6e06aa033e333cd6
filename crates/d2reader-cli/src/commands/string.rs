use anyhow::Result;
use d2reader_core::StringTier;

use super::open_session;
use crate::config::Config;

/// Resolve one string table id
pub fn run(config: &Config, pid: Option<u32>, id: u32) -> Result<()> {
    let process = super::open(config, pid)?;
    let session = open_session(&process)?;

    let (tier, local_id) = StringTier::split(id);
    match session.resolve_string(id)? {
        Some(text) => println!("{} ({:?} #{}): {}", id, tier, local_id, text),
        None => println!("{} ({:?} #{}): not found", id, tier, local_id),
    }
    Ok(())
}
