use anyhow::Result;

use super::open_session;
use crate::config::Config;

/// Describe the item under the cursor
pub fn run(config: &Config, pid: Option<u32>) -> Result<()> {
    let process = super::open(config, pid)?;
    let session = open_session(&process)?;

    if session.offsets().is_some_and(|o| o.hovered_item.is_none()) {
        println!("Build {} does not expose the hovered item", session.build());
        return Ok(());
    }

    match session.hovered_item()? {
        Some(item) => {
            for line in item.lines() {
                println!("{}", line);
            }
        }
        None => println!("No item hovered"),
    }
    Ok(())
}
