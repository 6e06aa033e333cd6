use serde::{Deserialize, Serialize};

/// Entry points of one string tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTables {
    /// Address holding the indexer table pointer
    pub indexer: u64,
    /// Address holding the address table pointer
    pub address: u64,
}

/// String tables of the base game, the patch and the expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTables {
    pub base: TierTables,
    pub patch: TierTables,
    pub expansion: TierTables,
}

/// Absolute addresses of the game structures for one attached process
///
/// Produced by `resolve_build`; never partially filled. Fields that a
/// build does not expose are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetTable {
    pub build: String,
    pub world: u64,
    pub players_x: u64,
    pub player_unit: u64,
    pub pause_menu: Option<u64>,
    pub unit_slots: u64,
    /// Added to the slot index before indexing `unit_slots`
    pub slot_bias: u32,
    pub hovered_item: Option<u64>,
    pub item_descriptions: u64,
    pub strings: Option<StringTables>,
}
