//! Kill tracking.
//!
//! The client keeps live units in a fixed table of 128 slots; a slot may
//! also chain further units through their "previous unit" pointer. A kill
//! is a monster that was seen alive and selectable in one scan and is found
//! in the dead mode in a later one. Corpses that were already dead when
//! first seen are never counted.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::error::Result;
use crate::game::{KillCategory, MonsterType, UnitType};
use crate::memory::ReadMemory;
use crate::memory::layout::{monster, slots, unit};
use crate::offset::OffsetTable;

/// Running kill bookkeeping for one session
///
/// Only `scan` mutates it. Every collection only grows; start a new state
/// to reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationState {
    observed: HashSet<u32>,
    dead: Vec<u32>,
    /// Same ids as `dead`, for lookups
    dead_set: HashSet<u32>,
    counts: BTreeMap<KillCategory, u32>,
}

impl ObservationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids seen alive and selectable
    pub fn observed(&self) -> &HashSet<u32> {
        &self.observed
    }

    /// Ids of killed units, in the order their deaths were noticed
    pub fn dead(&self) -> &[u32] {
        &self.dead
    }

    pub fn count(&self, category: KillCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Count for every category, including those still at zero
    pub fn kill_counts(&self) -> KillCounts {
        KillCounts(KillCategory::iter().map(|c| (c, self.count(c))).collect())
    }

    fn observe(&mut self, id: u32) {
        self.observed.insert(id);
    }

    /// Whether `id` was seen alive and its death is not yet recorded
    fn is_pending_kill(&self, id: u32) -> bool {
        self.observed.contains(&id) && !self.dead_set.contains(&id)
    }

    /// Record a death; returns false if it was not a new kill
    fn record_death(&mut self, id: u32, monster_type: MonsterType) -> bool {
        if !self.is_pending_kill(id) {
            return false;
        }
        self.dead.push(id);
        self.dead_set.insert(id);
        *self.counts.entry(KillCategory::Total).or_default() += 1;

        let category = monster_type.kill_category();
        if category.is_tracked() {
            *self.counts.entry(category).or_default() += 1;
        }
        true
    }
}

/// Snapshot of the kill counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KillCounts(pub BTreeMap<KillCategory, u32>);

impl KillCounts {
    pub fn get(&self, category: KillCategory) -> u32 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.get(KillCategory::Total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (KillCategory, u32)> + '_ {
        self.0.iter().map(|(c, n)| (*c, *n))
    }
}

/// Location of the unit slot table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTable {
    pub address: u64,
    pub bias: u32,
}

impl SlotTable {
    pub fn slot_address(&self, slot: u32) -> u64 {
        self.address + u64::from(slot + self.bias) * slots::SLOT_STRIDE
    }
}

impl From<&OffsetTable> for SlotTable {
    fn from(offsets: &OffsetTable) -> Self {
        Self {
            address: offsets.unit_slots,
            bias: offsets.slot_bias,
        }
    }
}

/// Outcome of one pass over the slot table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub units_seen: usize,
    pub new_kills: usize,
    pub failed_slots: usize,
}

/// Walk every slot once, updating `state`
///
/// A read failure abandons the affected slot only; units processed before
/// the failure keep their effect on `state`.
pub fn scan<R: ReadMemory>(
    reader: &R,
    table: &SlotTable,
    state: &mut ObservationState,
) -> ScanSummary {
    let mut summary = ScanSummary::default();

    for slot in 0..slots::SLOT_COUNT {
        if let Err(e) = scan_slot(reader, table, slot, state, &mut summary) {
            debug!("Slot {}: {}", slot, e);
            summary.failed_slots += 1;
        }
    }

    if summary.new_kills > 0 {
        debug!(
            "Scan: {} units, {} new kills, {} total",
            summary.units_seen,
            summary.new_kills,
            state.count(KillCategory::Total)
        );
    }
    summary
}

fn scan_slot<R: ReadMemory>(
    reader: &R,
    table: &SlotTable,
    slot: u32,
    state: &mut ObservationState,
    summary: &mut ScanSummary,
) -> Result<()> {
    let head = reader.read_ptr(table.slot_address(slot))?;
    if head == 0 {
        return Ok(());
    }

    // Collect the monster chain, then process the far end first
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = head;
    while current != 0 && chain.len() < slots::MAX_CHAIN_DEPTH && visited.insert(current) {
        if UnitType::from_u32(reader.read_u32(current + unit::TYPE)?) != Some(UnitType::Monster) {
            break;
        }
        chain.push(current);
        current = reader.read_ptr(current + unit::PREV_UNIT)?;
    }
    if current != 0 && !chain.is_empty() && chain.len() == slots::MAX_CHAIN_DEPTH {
        debug!("Slot {}: unit chain cut at {} units", slot, slots::MAX_CHAIN_DEPTH);
    }

    for &address in chain.iter().rev() {
        summary.units_seen += 1;
        if process_unit(reader, address, state)? {
            summary.new_kills += 1;
        }
    }
    Ok(())
}

/// Update `state` from one monster unit; returns true on a new kill
fn process_unit<R: ReadMemory>(
    reader: &R,
    address: u64,
    state: &mut ObservationState,
) -> Result<bool> {
    let mode = reader.read_u32(address + unit::MODE)?;
    let id = reader.read_u32(address + unit::UNIT_ID)?;
    let data = reader.read_ptr(address + unit::UNIT_DATA)?;

    if mode == unit::MODE_DEAD && id != unit::UNIT_ID_NONE {
        if !state.is_pending_kill(id) {
            return Ok(false);
        }
        let flag = reader.read_u8(data + monster::TYPE_FLAG)?;
        return Ok(state.record_death(id, MonsterType::from_type_flag(flag)));
    }

    // Summons and other non-targetable units never count
    let mon_stats = reader.read_ptr(data + monster::MON_STATS)?;
    if reader.read_i16(mon_stats + monster::MON_STATS_SELECTABLE)? > 0 {
        state.observe(id);
    }
    Ok(false)
}
