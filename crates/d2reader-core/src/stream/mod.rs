//! Overlay output for streaming software.
//!
//! Plain text files written to a configurable directory, meant to be read
//! by OBS text sources:
//!
//! - `kills.txt`: one `Category: n` line per kill category
//! - `player.txt`: name, level, experience progress, magic find, players
//! - `kills.json`: session start time and the same counts
//!
//! A disabled output accepts every call and writes nothing.

mod output;

pub use output::*;
