//! Memory layout constants for Diablo II data structures
//!
//! This module centralizes the sub-offsets, strides and sentinel values used
//! to walk game structures once a build's absolute addresses are known.
//! These are identical across every supported build; only the entry points
//! in `offset::builds` differ.

/// Unit record (`UnitAny`)
///
/// ```text
/// Offset   Field              Size    Description
/// ──────────────────────────────────────────────────────
/// 0x00     Type               4       0 player, 1 monster, 4 item, ...
/// 0x04     ClassId            4       Row in the type's data table
/// 0x0C     UnitId             4       In-game transient identifier
/// 0x10     Mode               4       Animation mode, 12 = dead
/// 0x14     UnitData           4       Player/Monster/Item data pointer
/// 0x5C     StatList           4       Attribute list pointer
/// 0xE4     PrevUnit           4       Chained unit sharing the slot
/// ```
pub mod unit {
    pub const TYPE: u64 = 0x00;
    pub const CLASS_ID: u64 = 0x04;
    pub const UNIT_ID: u64 = 0x0C;
    pub const MODE: u64 = 0x10;
    pub const UNIT_DATA: u64 = 0x14;
    pub const STAT_LIST: u64 = 0x5C;
    pub const PREV_UNIT: u64 = 0xE4;

    /// Mode value of a dead unit
    pub const MODE_DEAD: u32 = 12;

    /// Reserved unit id that never denotes a real monster
    pub const UNIT_ID_NONE: u32 = 1;
}

/// Player data, reached through `unit::UNIT_DATA` on the player unit
pub mod player {
    /// Character name, stored inline at the start of the record
    pub const NAME: u64 = 0x00;

    /// Character names are at most 15 characters plus terminator
    pub const NAME_MAX_LEN: usize = 16;
}

/// Monster data, reached through `unit::UNIT_DATA` on a monster unit
pub mod monster {
    /// Pointer to the monster's MonStats row
    pub const MON_STATS: u64 = 0x00;
    pub const TYPE_FLAG: u64 = 0x16;

    /// Offset in the MonStats row of the "selectable" flag
    pub const MON_STATS_SELECTABLE: u64 = 0x04;
}

/// Stat list (`StatListEx`)
pub mod stat_list {
    pub const FLAGS: u64 = 0x10;
    pub const COMPACT_ARRAY: u64 = 0x24;
    pub const FULL_ARRAY: u64 = 0x48;
    pub const COUNT: u64 = 0x4C;

    /// Flag values marking the "full" layout; anything else is compact
    pub const FULL_LAYOUT_FLAGS: [u32; 2] = [0x8000_0000, 0xA000_0000];

    /// Size of one entry: hi id (2), lo id (2), value (4)
    pub const ENTRY_SIZE: u64 = 8;
    pub const ENTRY_HI_ID: u64 = 0x0;
    pub const ENTRY_LO_ID: u64 = 0x2;
    pub const ENTRY_VALUE: u64 = 0x4;
}

/// String tables in the language module
///
/// ```text
/// Indexer table
/// Offset   Field              Size
/// ──────────────────────────────────────
/// 0x02     IdentifierCount    2
/// 0x04     AddressCount       4
/// 0x11     DataLength         2
/// 0x15     IdIndex[]          2 * IdentifierCount
/// ...      StringInfo[]       0x11 each
/// ```
pub mod strings {
    pub const IDENTIFIER_COUNT: u64 = 0x02;
    pub const ADDRESS_COUNT: u64 = 0x04;
    pub const DATA_LENGTH: u64 = 0x11;
    pub const ID_INDEX_REGION: u64 = 0x15;

    pub const ID_INDEX_STRIDE: u64 = 2;
    pub const STRING_INFO_STRIDE: u64 = 0x11;
    pub const ADDRESS_STRIDE: u64 = 4;

    /// Identifier substituted when a lookup id is past the table
    pub const MISSING_STRING_ID: u16 = 0x1F4;

    pub const PATCH_ID_OFFSET: u32 = 10_000;
    pub const EXPANSION_ID_OFFSET: u32 = 20_000;

    pub const INITIAL_BUFFER_SIZE: usize = 0x100;
    pub const MAX_BUFFER_SIZE: usize = 0x4000;
}

/// Item description (ItemsTxt) table
pub mod item {
    /// Stride of the table, stored at the table's entry point
    pub const TABLE_STRIDE: u64 = 0x0;
    /// Pointer to the first record
    pub const TABLE_RECORDS: u64 = 0x4;
    /// Name string id inside a record
    pub const NAME_STRING_ID: u64 = 0xF4;
}

/// Unit slot table walked by the kill tracker
pub mod slots {
    pub const SLOT_COUNT: u32 = 128;
    pub const SLOT_STRIDE: u64 = 4;

    /// Longest "previous unit" chain followed from one slot
    pub const MAX_CHAIN_DEPTH: usize = 64;
}

/// Offsets outside of any structure, relative to the executable image
pub mod exe {
    /// D2SE stores the hosted patch name here
    pub const D2SE_PATCH_STRING: u64 = 0x1A049;
    pub const D2SE_PATCH_MAX_LEN: usize = 16;
}

/// Timing constants for polling
pub mod timing {
    /// Interval between scans in the tracking loop (ms)
    pub const SCAN_INTERVAL_MS: u64 = 50;

    /// Delay between attach attempts while the game is not running (s)
    pub const ATTACH_RETRY_SECS: u64 = 5;
}
