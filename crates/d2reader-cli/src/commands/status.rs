use anyhow::Result;
use d2reader_core::attach;

use crate::config::Config;

/// Show process, build and game state
pub fn run(config: &Config, pid: Option<u32>) -> Result<()> {
    let process = super::open(config, pid)?;
    let session = attach(&process)?;

    println!("Process:    {} (PID {})", process.name, process.pid);
    println!("Executable: {}", process.exe_path.display());
    println!("Build:      {}", session.build());
    println!("Supported:  {}", session.is_supported());
    println!("PlugY:      {}", session.has_plugy());

    let Some(offsets) = session.offsets() else {
        return Ok(());
    };

    println!();
    println!("In game:    {}", session.is_in_game());
    println!("World (SP): {}", session.is_in_game_single_player());
    println!("Paused:     {}", session.is_paused());
    println!();
    println!("Offsets:");
    println!("  world:             0x{:X}", offsets.world);
    println!("  players_x:         0x{:X}", offsets.players_x);
    println!("  player_unit:       0x{:X}", offsets.player_unit);
    if let Some(pause) = offsets.pause_menu {
        println!("  pause_menu:        0x{:X}", pause);
    }
    println!(
        "  unit_slots:        0x{:X} (bias 0x{:X})",
        offsets.unit_slots, offsets.slot_bias
    );
    if let Some(hovered) = offsets.hovered_item {
        println!("  hovered_item:      0x{:X}", hovered);
    }
    println!("  item_descriptions: 0x{:X}", offsets.item_descriptions);
    if let Some(strings) = &offsets.strings {
        println!(
            "  strings:           base 0x{:X}, patch 0x{:X}, expansion 0x{:X}",
            strings.base.indexer, strings.patch.indexer, strings.expansion.indexer
        );
    }
    Ok(())
}
