//! # d2reader-core
//!
//! Core library for the d2reader kill and character tracker.
//!
//! This crate provides:
//! - Build identification and per-build offset tables
//! - Windows process memory reading behind the `ReadMemory` trait
//! - Decoders for unit stat lists and the localized string tables
//! - Kill tracking over the live unit table
//! - Text file output for stream overlays
//!
//! ## Feature Flags
//!
//! - `debug-tools`: Enables hexdump helpers for inspecting raw memory.
//!   This feature is intended for CLI tools and development.

pub mod d2reader;
#[cfg(feature = "debug-tools")]
pub mod debug;
pub mod error;
pub mod game;
pub mod memory;
pub mod offset;
pub mod stream;

pub use d2reader::{D2Reader, UnitAttributes, attach, detect_build};
pub use error::{Error, Result};
pub use game::{
    AttributeEntry, ExpProgress, GameState, GameStateDetector, HoveredItem, KillCategory,
    KillCounts, MonsterType, ObservationState, PlayerStats, ScanSummary, SlotTable, StringTier,
    TranslatedStat, UnitType, decode_attributes, extract_string, resolve_string, scan,
    translate_stat, translate_stats,
};
pub use memory::{
    D2SE_EXE, GAME_EXE, MemoryReader, ModuleInfo, ProcessHandle, ReadMemory,
    decode_windows_1252, query_file_version,
};
pub use offset::{
    BuildIdentifier, FileVersion, GameModule, ModuleBases, OffsetTable, StringTables,
    TierTables, resolve_build, supported_builds,
};
pub use stream::StreamOutput;

// Debug utilities (requires debug-tools feature)
#[cfg(feature = "debug-tools")]
pub use debug::{format_hexdump_line, hexdump, module_address};
