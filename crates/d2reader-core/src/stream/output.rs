use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::Result;
use crate::game::{KillCounts, PlayerStats};

#[derive(Debug, Clone)]
pub struct StreamOutput {
    enabled: bool,
    base_dir: PathBuf,
}

#[derive(Serialize)]
struct KillsDocument<'a> {
    session_started: DateTime<Local>,
    counts: &'a KillCounts,
}

impl StreamOutput {
    pub fn new(enabled: bool, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            base_dir: base_dir.into(),
        }
    }

    /// Output that never writes anything
    pub fn disabled() -> Self {
        Self::new(false, PathBuf::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn write_kills(&self, counts: &KillCounts, session_started: DateTime<Local>) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let text: Vec<String> = counts.iter().map(|(c, n)| format!("{}: {}", c, n)).collect();
        self.write_file("kills.txt", &text.join("\n"))?;

        let document = KillsDocument {
            session_started,
            counts,
        };
        self.write_file("kills.json", &serde_json::to_string_pretty(&document)?)
    }

    pub fn write_player(&self, stats: &PlayerStats) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let content = format!(
            "{}\nLevel {} ({:.1}%)\nMF: {}%\nPlayers: {}",
            stats.name,
            stats.level,
            stats.exp_percent * 100.0,
            stats.magic_find,
            stats.players_x
        );
        self.write_file("player.txt", &content)
    }

    /// Blank the player file, e.g. when leaving the game
    pub fn clear_player(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.write_file("player.txt", "")
    }

    fn write_file(&self, filename: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        fs::write(self.base_dir.join(filename), content)?;
        Ok(())
    }
}
