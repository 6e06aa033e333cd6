use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRepr, Display,
)]
#[repr(u32)]
pub enum UnitType {
    Player = 0,
    Monster = 1,
    Object = 2,
    Missile = 3,
    Item = 4,
    Tile = 5,
}

impl UnitType {
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::from_repr(value)
    }
}

/// Monster rarity, decoded from the monster data type flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MonsterType {
    Normal,
    SuperUnique,
    Unique,
    Champion,
    Minion,
}

/// Rarity bits of the monster data type flag
mod type_flag {
    pub const SUPER_UNIQUE: u8 = 0x02;
    pub const CHAMPION: u8 = 0x04;
    pub const UNIQUE: u8 = 0x08;
    pub const MINION: u8 = 0x10;
}

impl MonsterType {
    /// Classify a type flag by its rarity bits
    ///
    /// Possessed (0x20), ghostly (0x40) and multishot (0x80) modifiers are
    /// ignored. Minions of super uniques carry both bits and count as minions.
    pub fn from_type_flag(flag: u8) -> Self {
        if flag & type_flag::MINION != 0 {
            Self::Minion
        } else if flag & type_flag::SUPER_UNIQUE != 0 {
            Self::SuperUnique
        } else if flag & type_flag::UNIQUE != 0 {
            Self::Unique
        } else if flag & type_flag::CHAMPION != 0 {
            Self::Champion
        } else {
            Self::Normal
        }
    }

    /// Kill category this monster counts towards besides `Total`
    pub fn kill_category(&self) -> KillCategory {
        match self {
            Self::SuperUnique | Self::Unique => KillCategory::Unique,
            Self::Champion => KillCategory::Champion,
            Self::Minion => KillCategory::Minion,
            Self::Normal => KillCategory::Other,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum KillCategory {
    Total,
    Unique,
    Champion,
    Minion,
    Other,
}

impl KillCategory {
    /// Whether kills of this category are tallied separately from `Total`
    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Unique | Self::Champion | Self::Minion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_type_from_u32() {
        assert_eq!(UnitType::from_u32(1), Some(UnitType::Monster));
        assert_eq!(UnitType::from_u32(4), Some(UnitType::Item));
        assert_eq!(UnitType::from_u32(6), None);
    }

    #[test]
    fn test_type_flag_mapping() {
        assert_eq!(MonsterType::from_type_flag(0x08), MonsterType::Unique);
        assert_eq!(MonsterType::from_type_flag(0x0A), MonsterType::SuperUnique);
        assert_eq!(MonsterType::from_type_flag(0x04), MonsterType::Champion);
        assert_eq!(MonsterType::from_type_flag(0x10), MonsterType::Minion);
        assert_eq!(MonsterType::from_type_flag(0x12), MonsterType::Minion);
        assert_eq!(MonsterType::from_type_flag(0x01), MonsterType::Normal);
        assert_eq!(MonsterType::from_type_flag(0x40), MonsterType::Normal);
    }

    #[test]
    fn test_type_flag_modifiers_are_ignored() {
        assert_eq!(MonsterType::from_type_flag(0x44), MonsterType::Champion);
        assert_eq!(MonsterType::from_type_flag(0x24), MonsterType::Champion);
        assert_eq!(MonsterType::from_type_flag(0x88), MonsterType::Unique);
        assert_eq!(MonsterType::from_type_flag(0x50), MonsterType::Minion);
    }

    #[test]
    fn test_kill_category() {
        assert_eq!(MonsterType::SuperUnique.kill_category(), KillCategory::Unique);
        assert_eq!(MonsterType::Normal.kill_category(), KillCategory::Other);
        assert!(KillCategory::Champion.is_tracked());
        assert!(!KillCategory::Other.is_tracked());
        assert!(!KillCategory::Total.is_tracked());
    }
}
