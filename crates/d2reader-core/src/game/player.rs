use serde::Serialize;

use crate::error::Result;
use crate::game::{AttributeEntry, decode_attributes, find_stat, stat_id};
use crate::memory::ReadMemory;
use crate::memory::layout::{player, unit};
use crate::offset::OffsetTable;

pub const MAX_LEVEL: i64 = 99;

/// Total experience required to reach each level, starting at level 1
pub const EXP_TABLE: [u32; 99] = [
    0, 500, 1_500, 3_750, 7_875, 14_175, 22_680, 32_886, 44_396, 57_715, 72_144, 90_180,
    112_725, 140_906, 176_132, 220_165, 275_207, 344_008, 430_010, 537_513, 671_891, 839_864,
    1_049_830, 1_312_287, 1_640_359, 2_050_449, 2_563_061, 3_203_826, 3_902_260, 4_663_553,
    5_493_363, 6_397_855, 7_383_752, 8_458_379, 9_629_723, 10_906_488, 12_298_162, 13_815_086,
    15_468_534, 17_270_791, 19_235_252, 21_376_515, 23_710_491, 26_254_525, 29_027_522,
    32_050_088, 35_344_686, 38_935_798, 42_850_109, 47_116_709, 51_767_302, 56_836_449,
    62_361_819, 68_384_473, 74_949_165, 82_104_680, 89_904_191, 98_405_658, 107_672_256,
    117_772_849, 128_782_495, 140_783_010, 153_863_570, 168_121_381, 183_662_396, 200_602_101,
    219_066_380, 239_192_444, 261_129_853, 285_041_630, 311_105_466, 339_515_048, 370_481_492,
    404_234_916, 441_026_148, 481_128_591, 524_840_254, 572_485_967, 624_419_793, 681_027_665,
    742_730_244, 809_986_056, 883_294_891, 963_201_521, 1_050_299_747, 1_145_236_814,
    1_248_718_217, 1_361_512_946, 1_484_459_201, 1_618_470_619, 1_764_543_065, 1_923_762_030,
    2_097_310_703, 2_286_478_756, 2_492_671_933, 2_717_422_497, 2_962_400_612, 3_229_426_756,
    3_520_485_254,
];

/// Experience needed to reach `level`, if it is a real level
pub fn exp_for_level(level: i64) -> Option<i64> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return None;
    }
    Some(i64::from(EXP_TABLE[(level - 1) as usize]))
}

/// Progress towards the next level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpProgress {
    /// Total experience at which the next level is reached
    pub to_next: i64,
    pub missing: i64,
    /// Fraction of the current level done, 0.0 to 1.0
    pub percent: f64,
}

impl ExpProgress {
    /// Progress for a character
    ///
    /// An unknown level has no next threshold: `to_next` is -1 and
    /// `missing` is `-1 - experience`. Its `percent` is 0.0 rather than a
    /// ratio against a missing level span.
    pub fn new(level: i64, experience: i64) -> Self {
        let Some(current) = exp_for_level(level) else {
            return Self {
                to_next: -1,
                missing: -1 - experience,
                percent: 0.0,
            };
        };

        match exp_for_level(level + 1) {
            Some(next) => Self {
                to_next: next,
                missing: next - experience,
                percent: (experience - current) as f64 / (next - current) as f64,
            },
            // Level 99 has nothing left to earn
            None => Self {
                to_next: current,
                missing: 0,
                percent: 1.0,
            },
        }
    }
}

/// Summary of the controlled character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub name: String,
    /// -1 when the stat is missing from the list
    pub level: i64,
    pub experience: i64,
    pub exp_to_next: i64,
    pub exp_missing: i64,
    pub exp_percent: f64,
    pub magic_find: i64,
    /// Difficulty setting of the game, at least 1
    pub players_x: u32,
}

impl PlayerStats {
    pub fn from_attributes(name: String, entries: &[AttributeEntry], players_x: u32) -> Self {
        let level = find_stat(entries, stat_id::LEVEL).unwrap_or(-1);
        let experience = find_stat(entries, stat_id::EXPERIENCE).unwrap_or(-1);
        let progress = ExpProgress::new(level, experience);

        Self {
            name,
            level,
            experience,
            exp_to_next: progress.to_next,
            exp_missing: progress.missing,
            exp_percent: progress.percent,
            magic_find: find_stat(entries, stat_id::MAGIC_FIND).unwrap_or(-1),
            players_x: players_x.max(1),
        }
    }
}

/// Address of the controlled player's unit
pub fn player_unit<R: ReadMemory>(reader: &R, offsets: &OffsetTable) -> Result<u64> {
    reader.read_ptr(offsets.player_unit)
}

/// Name of the character owning `player_unit`
///
/// Fails while no game is loaded, since the player data is unmapped.
pub fn player_name<R: ReadMemory>(reader: &R, player_unit: u64) -> Result<String> {
    let data = reader.read_ptr(player_unit + unit::UNIT_DATA)?;
    reader.read_string(data + player::NAME, player::NAME_MAX_LEN)
}

pub fn read_player_stats<R: ReadMemory>(reader: &R, offsets: &OffsetTable) -> Result<PlayerStats> {
    let unit = player_unit(reader, offsets)?;
    let name = player_name(reader, unit)?;
    let entries = decode_attributes(reader, unit)?;
    let players_x = reader.read_u32(offsets.players_x)?;
    Ok(PlayerStats::from_attributes(name, &entries, players_x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::stats::tests::stat_bytes;
    use crate::memory::MockMemoryBuilder;
    use crate::memory::layout::stat_list;

    fn entry(lo_id: u16, value: i64) -> AttributeEntry {
        AttributeEntry {
            hi_id: 0,
            lo_id,
            value,
        }
    }

    #[test]
    fn test_exp_table_is_increasing() {
        assert!(EXP_TABLE.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(exp_for_level(1), Some(0));
        assert_eq!(exp_for_level(99), Some(3_520_485_254));
        assert_eq!(exp_for_level(0), None);
        assert_eq!(exp_for_level(100), None);
    }

    #[test]
    fn test_exp_progress_mid_level() {
        // Level 2 spans 500..1500
        let progress = ExpProgress::new(2, 1_000);
        assert_eq!(progress.to_next, 1_500);
        assert_eq!(progress.missing, 500);
        assert!((progress.percent - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exp_progress_max_and_unknown_level() {
        let progress = ExpProgress::new(99, 3_520_485_254);
        assert_eq!(progress.percent, 1.0);
        assert_eq!(progress.missing, 0);

        let progress = ExpProgress::new(-1, -1);
        assert_eq!(progress.to_next, -1);
        assert_eq!(progress.missing, 0);
        assert_eq!(progress.percent, 0.0);

        let progress = ExpProgress::new(0, 500);
        assert_eq!(progress.to_next, -1);
        assert_eq!(progress.missing, -501);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn test_player_stats_defaults() {
        let stats = PlayerStats::from_attributes("Nyx".into(), &[entry(12, 55)], 0);
        assert_eq!(stats.level, 55);
        assert_eq!(stats.experience, -1);
        assert_eq!(stats.magic_find, -1);
        assert_eq!(stats.players_x, 1);
    }

    #[test]
    fn test_read_player_stats() {
        let offsets = OffsetTable {
            build: "1.14d".into(),
            world: 0x100,
            players_x: 0x104,
            player_unit: 0x108,
            pause_menu: None,
            unit_slots: 0x10C,
            slot_bias: 0x80,
            hovered_item: None,
            item_descriptions: 0x110,
            strings: None,
        };
        let reader = MockMemoryBuilder::new()
            .write_u32(0x104, 3)
            .write_u32(0x108, 0x1000)
            .write_u32(0x1000 + unit::UNIT_DATA, 0x5000)
            .write_bytes(0x5000, b"Sorceress\0\0\0\0\0\0\0")
            .write_u32(0x1000 + unit::STAT_LIST, 0x2000)
            .write_u32(0x2000 + stat_list::FLAGS, 0)
            .write_u32(0x2000 + stat_list::COMPACT_ARRAY, 0x3000)
            .write_u16(0x2000 + stat_list::COUNT, 3)
            .write_bytes(0x3000, &stat_bytes(&[(0, 12, 2), (0, 13, 1_000), (0, 80, 250)]))
            .build();

        let stats = read_player_stats(&reader, &offsets).unwrap();
        assert_eq!(stats.name, "Sorceress");
        assert_eq!(stats.level, 2);
        assert_eq!(stats.exp_to_next, 1_500);
        assert_eq!(stats.magic_find, 250);
        assert_eq!(stats.players_x, 3);
    }
}
