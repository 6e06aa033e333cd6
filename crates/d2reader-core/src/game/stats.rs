//! Unit attribute lists.
//!
//! A unit's stats live in a sparse list of `(hi id, lo id, value)` entries.
//! The list has two physical layouts; which one is in use is signalled by
//! the list's flag word:
//!
//! ```text
//! StatList
//! Offset   Field              Size
//! ──────────────────────────────────────
//! 0x10     Flags              4       0x80000000 / 0xA0000000 = full
//! 0x24     CompactArray       4       entries when compact
//! 0x48     FullArray          4       entries when full
//! 0x4C     Count              2
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::ReadMemory;
use crate::memory::layout::{stat_list, unit};

/// Stat ids the player summary reads
pub mod stat_id {
    pub const LEVEL: u16 = 12;
    pub const EXPERIENCE: u16 = 13;
    pub const MAGIC_FIND: u16 = 80;
}

/// One decoded stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub hi_id: u16,
    pub lo_id: u16,
    /// Signed 32-bit except for stats stored unsigned, which are widened
    pub value: i64,
}

/// Physical layout of a stat list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatListLayout {
    Full,
    Compact,
}

impl StatListLayout {
    pub fn from_flags(flags: u32) -> Self {
        if stat_list::FULL_LAYOUT_FLAGS.contains(&flags) {
            Self::Full
        } else {
            Self::Compact
        }
    }

    fn array_offset(&self) -> u64 {
        match self {
            Self::Full => stat_list::FULL_ARRAY,
            Self::Compact => stat_list::COMPACT_ARRAY,
        }
    }
}

/// Whether a stat's value is stored as an unsigned 32-bit integer
pub fn is_unsigned_stat(lo_id: u16) -> bool {
    lo_id == stat_id::EXPERIENCE
}

/// Decode every entry of a unit's stat list, in table order
///
/// Nothing is cached; the list is re-read on every call. Duplicate ids are
/// returned as stored.
pub fn decode_attributes<R: ReadMemory>(
    reader: &R,
    unit_address: u64,
) -> Result<Vec<AttributeEntry>> {
    let list = reader.read_ptr(unit_address + unit::STAT_LIST)?;
    let layout = StatListLayout::from_flags(reader.read_u32(list + stat_list::FLAGS)?);
    let array = reader.read_ptr(list + layout.array_offset())?;
    let count = reader.read_i16(list + stat_list::COUNT)?.max(0) as u64;

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count {
        let entry = array + i * stat_list::ENTRY_SIZE;
        let hi_id = reader.read_u16(entry + stat_list::ENTRY_HI_ID)?;
        let lo_id = reader.read_u16(entry + stat_list::ENTRY_LO_ID)?;
        let value = if is_unsigned_stat(lo_id) {
            i64::from(reader.read_u32(entry + stat_list::ENTRY_VALUE)?)
        } else {
            i64::from(reader.read_i32(entry + stat_list::ENTRY_VALUE)?)
        };
        entries.push(AttributeEntry {
            hi_id,
            lo_id,
            value,
        });
    }
    Ok(entries)
}

/// First value of a base stat (`hi_id == 0`), if present
pub fn find_stat(entries: &[AttributeEntry], lo_id: u16) -> Option<i64> {
    entries
        .iter()
        .find(|e| e.lo_id == lo_id && e.hi_id == 0)
        .map(|e| e.value)
}
