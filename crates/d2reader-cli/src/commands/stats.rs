use anyhow::{Result, bail};
use d2reader_core::UnitAttributes;

use super::open_session;
use crate::config::Config;

/// Print the character summary and stat list
pub fn run(config: &Config, pid: Option<u32>, translate: bool, json: bool) -> Result<()> {
    let process = super::open(config, pid)?;
    let session = open_session(&process)?;
    if !session.is_in_game() {
        bail!("No character is in game");
    }

    let stats = session.player_stats()?;
    let attributes = session.player_attributes(translate)?;

    if json {
        let attributes = match &attributes {
            UnitAttributes::Raw(entries) => serde_json::to_value(entries)?,
            UnitAttributes::Translated(stats) => serde_json::to_value(stats)?,
        };
        let document = serde_json::json!({ "player": stats, "attributes": attributes });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    println!("{} - level {}", stats.name, stats.level);
    println!(
        "Experience: {} / {} ({:.2}%, {} missing)",
        stats.experience,
        stats.exp_to_next,
        stats.exp_percent * 100.0,
        stats.exp_missing
    );
    println!("Magic find: {}%", stats.magic_find);
    println!("Players:    {}", stats.players_x);
    println!();

    match attributes {
        UnitAttributes::Raw(entries) => {
            println!("{:>5} {:>5} {:>12}", "lo", "hi", "value");
            for entry in entries {
                println!("{:>5} {:>5} {:>12}", entry.lo_id, entry.hi_id, entry.value);
            }
        }
        UnitAttributes::Translated(stats) => {
            for stat in stats {
                if stat.value.is_empty() {
                    println!("{}", stat.display);
                } else {
                    println!("{}: {}", stat.display, stat.value);
                }
            }
        }
    }
    Ok(())
}
