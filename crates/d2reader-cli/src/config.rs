//! CLI configuration file (`d2reader.toml`).
//!
//! ```toml
//! process_names = ["Game.exe", "D2SE.exe"]
//! poll_interval_ms = 50
//! attach_retry_secs = 5
//! log_filter = "d2reader=info"
//! stream_dir = "overlay"
//! ```
//!
//! Every key is optional. A missing or unreadable file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use d2reader_core::memory::layout::timing;
use d2reader_core::{D2SE_EXE, GAME_EXE};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "d2reader.toml";
pub const DEFAULT_LOG_FILTER: &str = "d2reader=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Executables to attach to, tried in order
    pub process_names: Vec<String>,
    pub poll_interval_ms: u64,
    pub attach_retry_secs: u64,
    pub log_filter: String,
    /// Directory for overlay text files; disabled when unset
    pub stream_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_names: vec![GAME_EXE.to_string(), D2SE_EXE.to_string()],
            poll_interval_ms: timing::SCAN_INTERVAL_MS,
            attach_retry_secs: timing::ATTACH_RETRY_SECS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            stream_dir: None,
        }
    }
}

impl Config {
    /// `d2reader.toml` in the working directory, else in the user config dir
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .map(|dir| dir.join("d2reader").join(CONFIG_FILE_NAME))
            .unwrap_or(local)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load `path`, falling back to defaults when it is missing or invalid
    ///
    /// Runs before logging is set up, so problems go straight to stderr.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn process_names(&self) -> Vec<&str> {
        self.process_names.iter().map(String::as_str).collect()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn attach_retry(&self) -> Duration {
        Duration::from_secs(self.attach_retry_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.process_names(), ["Game.exe", "D2SE.exe"]);
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.attach_retry(), Duration::from_secs(5));
        assert!(config.stream_dir.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "poll_interval_ms = 100\nstream_dir = \"obs\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.stream_dir, Some(PathBuf::from("obs")));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_invalid_or_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(Config::load_or_default(&path), Config::default());

        fs::write(&path, "poll_interval_ms = \"fast\"").unwrap();
        assert!(Config::load(&path).is_err());
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let config = Config {
            poll_interval_ms: 0,
            attach_retry_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(config.attach_retry(), Duration::from_secs(1));
    }
}
