//! Reader session over one attached game process.
//!
//! `D2Reader` ties a memory accessor to the offsets of the detected build
//! and owns the kill bookkeeping of the session:
//!
//! ```ignore
//! let process = ProcessHandle::find_and_open(&[GAME_EXE, D2SE_EXE])?;
//! let mut reader = attach(&process)?;
//!
//! if reader.is_in_game() {
//!     reader.update_kills()?;
//!     println!("{:?}", reader.player_stats()?);
//! }
//! ```
//!
//! An unsupported build still produces a reader; every query that needs
//! offsets then fails with `Error::UnsupportedBuild`, and the boolean
//! queries report `false`.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::game::{
    AttributeEntry, HoveredItem, KillCounts, ObservationState, PlayerStats, ScanSummary,
    SlotTable, TranslatedStat, decode_attributes, player_name, player_unit, read_hovered_item,
    read_player_stats, resolve_string, scan, translate_stats,
};
use crate::memory::{MemoryReader, ProcessHandle, ReadMemory, query_file_version};
use crate::offset::{BuildIdentifier, ModuleBases, OffsetTable, resolve_build};

/// Attribute list of a unit, raw or translated for display
#[derive(Debug, Clone, PartialEq)]
pub enum UnitAttributes {
    Raw(Vec<AttributeEntry>),
    Translated(Vec<TranslatedStat>),
}

impl UnitAttributes {
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(entries) => entries.len(),
            Self::Translated(stats) => stats.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct D2Reader<R: ReadMemory> {
    reader: R,
    build: BuildIdentifier,
    plugy: bool,
    offsets: Option<OffsetTable>,
    kills: ObservationState,
    session_started: DateTime<Local>,
}

impl<R: ReadMemory> D2Reader<R> {
    /// Bind `reader` to a build
    ///
    /// Unknown builds are accepted and leave the reader without offsets.
    /// Missing modules are an error, since they are expected to appear once
    /// the game finishes loading.
    pub fn new(reader: R, build: BuildIdentifier, bases: &ModuleBases) -> Result<Self> {
        let offsets = match resolve_build(&build, bases) {
            Ok(offsets) => Some(offsets),
            Err(e) if e.is_unsupported() => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            reader,
            build,
            plugy: bases.has_plugy(),
            offsets,
            kills: ObservationState::new(),
            session_started: Local::now(),
        })
    }

    /// Bind `reader` to an already resolved offset table
    pub fn with_offsets(reader: R, offsets: OffsetTable) -> Self {
        Self {
            reader,
            build: BuildIdentifier::new(offsets.build.clone()),
            plugy: false,
            offsets: Some(offsets),
            kills: ObservationState::new(),
            session_started: Local::now(),
        }
    }

    pub fn build(&self) -> &BuildIdentifier {
        &self.build
    }

    pub fn is_supported(&self) -> bool {
        self.offsets.is_some()
    }

    pub fn has_plugy(&self) -> bool {
        self.plugy
    }

    pub fn offsets(&self) -> Option<&OffsetTable> {
        self.offsets.as_ref()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    fn require_offsets(&self) -> Result<&OffsetTable> {
        self.offsets
            .as_ref()
            .ok_or_else(|| Error::UnsupportedBuild(self.build.to_string()))
    }

    /// Whether the pause menu is open; `false` when the build cannot tell
    pub fn is_paused(&self) -> bool {
        let Some(address) = self.offsets.as_ref().and_then(|o| o.pause_menu) else {
            return false;
        };
        match self.reader.read_u32(address) {
            Ok(value) => value != 0,
            Err(e) => {
                debug!("Pause flag unreadable: {}", e);
                false
            }
        }
    }

    /// Whether a character is loaded, judged by its name being readable
    pub fn is_in_game(&self) -> bool {
        let Ok(offsets) = self.require_offsets() else {
            return false;
        };
        player_unit(&self.reader, offsets)
            .and_then(|unit| player_name(&self.reader, unit))
            .is_ok()
    }

    /// Single player only: whether the server-side world exists
    pub fn is_in_game_single_player(&self) -> bool {
        let Ok(offsets) = self.require_offsets() else {
            return false;
        };
        self.reader.read_u32(offsets.world).is_ok_and(|world| world != 0)
    }

    pub fn player_stats(&self) -> Result<PlayerStats> {
        read_player_stats(&self.reader, self.require_offsets()?)
    }

    /// Stats of the unit at `unit_address`, read fresh
    pub fn unit_attributes(&self, unit_address: u64, translate: bool) -> Result<UnitAttributes> {
        let entries = decode_attributes(&self.reader, unit_address)?;
        Ok(if translate {
            UnitAttributes::Translated(translate_stats(&entries))
        } else {
            UnitAttributes::Raw(entries)
        })
    }

    /// Stats of the controlled character
    pub fn player_attributes(&self, translate: bool) -> Result<UnitAttributes> {
        let unit = player_unit(&self.reader, self.require_offsets()?)?;
        if unit == 0 {
            return Err(Error::NotInGame);
        }
        self.unit_attributes(unit, translate)
    }

    /// Look up a localized string; `None` on builds without string tables
    pub fn resolve_string(&self, id: u32) -> Result<Option<String>> {
        match &self.require_offsets()?.strings {
            Some(tables) => resolve_string(&self.reader, tables, id),
            None => Ok(None),
        }
    }

    pub fn hovered_item(&self) -> Result<Option<HoveredItem>> {
        read_hovered_item(&self.reader, self.require_offsets()?)
    }

    /// Scan the unit table once and update the kill counters
    pub fn update_kills(&mut self) -> Result<ScanSummary> {
        let table = SlotTable::from(self.require_offsets()?);
        Ok(scan(&self.reader, &table, &mut self.kills))
    }

    pub fn kill_counts(&self) -> KillCounts {
        self.kills.kill_counts()
    }

    pub fn observation(&self) -> &ObservationState {
        &self.kills
    }

    /// Drop all kill bookkeeping and start counting from zero
    pub fn new_session(&mut self) {
        info!(
            "Starting new kill session ({} kills in previous)",
            self.kills.kill_counts().total()
        );
        self.kills = ObservationState::new();
        self.session_started = Local::now();
    }

    pub fn session_started(&self) -> DateTime<Local> {
        self.session_started
    }
}

/// Detect the build running in `process`
pub fn detect_build<R: ReadMemory>(process: &ProcessHandle, reader: &R) -> Result<BuildIdentifier> {
    if process.is_d2se() {
        return BuildIdentifier::read_d2se(reader);
    }
    let version = query_file_version(&process.exe_path)?;
    debug!("{} file version {}", process.name, version);
    Ok(BuildIdentifier::from_file_version(version))
}

/// Identify the build of an attached process and open a reader session on it
pub fn attach(process: &ProcessHandle) -> Result<D2Reader<MemoryReader<'_>>> {
    let reader = MemoryReader::new(process);
    let build = detect_build(process, &reader)?;
    let modules = process.modules()?;
    let bases = ModuleBases::from_modules(process.base_address, &modules);

    let session = D2Reader::new(reader, build, &bases)?;
    if session.is_supported() {
        info!(
            "Attached to {} (pid {}), build {}{}",
            process.name,
            process.pid,
            session.build(),
            if session.has_plugy() { " with PlugY" } else { "" }
        );
    } else {
        warn!(
            "Attached to {} (pid {}), but build {} is not supported",
            process.name,
            process.pid,
            session.build()
        );
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{KillCategory, UnitType};
    use crate::game::stats::tests::stat_bytes;
    use crate::memory::MockMemoryBuilder;
    use crate::memory::layout::{monster, slots, stat_list, unit};
    use crate::offset::GameModule;

    fn offsets() -> OffsetTable {
        OffsetTable {
            build: "1.14d".into(),
            world: 0x100,
            players_x: 0x104,
            player_unit: 0x108,
            pause_menu: Some(0x10C),
            unit_slots: 0x1000,
            slot_bias: 0,
            hovered_item: None,
            item_descriptions: 0x110,
            strings: None,
        }
    }

    /// Player at 0x2000 named "Amazon" with level 10, slot table empty
    fn game_memory() -> MockMemoryBuilder {
        MockMemoryBuilder::new()
            .write_u32(0x100, 0xAAAA)
            .write_u32(0x104, 1)
            .write_u32(0x108, 0x2000)
            .write_u32(0x10C, 1)
            .zeroed(0x1000, (slots::SLOT_COUNT * 4) as usize)
            .write_u32(0x2000 + unit::UNIT_DATA, 0x2800)
            .write_bytes(0x2800, b"Amazon\0\0\0\0\0\0\0\0\0\0")
            .write_u32(0x2000 + unit::STAT_LIST, 0x3000)
            .write_u32(0x3000 + stat_list::FLAGS, 0)
            .write_u32(0x3000 + stat_list::COMPACT_ARRAY, 0x3800)
            .write_u16(0x3000 + stat_list::COUNT, 2)
            .write_bytes(0x3800, &stat_bytes(&[(0, 12, 10), (0, 39, 30)]))
    }

    #[test]
    fn test_unsupported_build_has_no_offsets() {
        let bases = ModuleBases::default().with(GameModule::Executable, 0x40_0000);
        let reader = D2Reader::new(game_memory().build(), "1.10f".into(), &bases).unwrap();

        assert!(!reader.is_supported());
        assert!(!reader.is_paused());
        assert!(!reader.is_in_game());
        assert!(reader.player_stats().unwrap_err().is_unsupported());
        assert!(reader.resolve_string(5).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_missing_module_is_an_error() {
        let bases = ModuleBases::default().with(GameModule::Executable, 0x40_0000);
        let result = D2Reader::new(game_memory().build(), "1.13c".into(), &bases);
        assert!(matches!(result, Err(Error::ModuleNotLoaded(_))));
    }

    #[test]
    fn test_in_game_queries() {
        let reader = D2Reader::with_offsets(game_memory().build(), offsets());
        assert!(reader.is_in_game());
        assert!(reader.is_in_game_single_player());
        assert!(reader.is_paused());

        let stats = reader.player_stats().unwrap();
        assert_eq!(stats.name, "Amazon");
        assert_eq!(stats.level, 10);
        assert_eq!(reader.build().as_str(), "1.14d");
    }

    #[test]
    fn test_out_of_game_folds_to_false() {
        // Player unit points at unmapped memory, pause flag unmapped
        let mut memory = game_memory().build();
        memory.write_u32(0x108, 0xDEAD_0000);
        memory.unmap(0x10C, 4);
        memory.write_u32(0x100, 0);

        let reader = D2Reader::with_offsets(memory, offsets());
        assert!(!reader.is_in_game());
        assert!(!reader.is_in_game_single_player());
        assert!(!reader.is_paused());
        assert!(reader.player_stats().unwrap_err().is_memory_access());
    }

    #[test]
    fn test_unit_attributes_raw_and_translated() {
        let reader = D2Reader::with_offsets(game_memory().build(), offsets());

        let raw = reader.unit_attributes(0x2000, false).unwrap();
        assert!(matches!(&raw, UnitAttributes::Raw(e) if e[0].value == 10));

        let UnitAttributes::Translated(stats) = reader.player_attributes(true).unwrap() else {
            panic!("expected translated stats");
        };
        assert_eq!(stats[1].display, "Fire Resist");
        assert_eq!(stats[1].value, "30%");
    }

    #[test]
    fn test_string_lookup_without_tables() {
        let reader = D2Reader::with_offsets(game_memory().build(), offsets());
        assert_eq!(reader.resolve_string(25_000).unwrap(), None);
        assert_eq!(reader.hovered_item().unwrap(), None);
    }

    #[test]
    fn test_kill_session_lifecycle() {
        let memory = game_memory()
            .write_u32(0x1000, 0x5000)
            .zeroed(0x5000, 0x100)
            .write_u32(0x5000 + unit::TYPE, UnitType::Monster as u32)
            .write_u32(0x5000 + unit::UNIT_ID, 300)
            .write_u32(0x5000 + unit::MODE, 1)
            .write_u32(0x5000 + unit::UNIT_DATA, 0x6000)
            .zeroed(0x6000, 0x20)
            .write_bytes(0x6000 + monster::TYPE_FLAG, &[0x04])
            .write_u32(0x6000 + monster::MON_STATS, 0x7000)
            .write_i16(0x7000 + monster::MON_STATS_SELECTABLE, 1)
            .build();
        let mut reader = D2Reader::with_offsets(memory, offsets());

        reader.update_kills().unwrap();
        assert_eq!(reader.kill_counts().total(), 0);

        reader.reader_mut().write_u32(0x5000 + unit::MODE, unit::MODE_DEAD);
        let summary = reader.update_kills().unwrap();
        assert_eq!(summary.new_kills, 1);
        assert_eq!(reader.kill_counts().get(KillCategory::Champion), 1);

        reader.new_session();
        assert_eq!(reader.kill_counts().total(), 0);
        assert!(reader.observation().observed().is_empty());

        // The corpse is still there but was never seen alive in this session
        reader.update_kills().unwrap();
        assert_eq!(reader.kill_counts().total(), 0);
    }
}
