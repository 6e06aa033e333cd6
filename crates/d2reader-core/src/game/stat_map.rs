//! Human-readable stat names.
//!
//! Ids follow the game's stat cost table. Stats not listed here are shown
//! by number so nothing read from memory is silently dropped.

use serde::Serialize;

use crate::game::AttributeEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatFormat {
    /// Plain signed number
    Number,
    /// Number followed by `%`
    Percent,
    /// Fixed point with 8 fractional bits (life, mana, stamina)
    Shifted,
    /// Internal bookkeeping, never displayed
    Hidden,
}

use StatFormat::{Hidden, Number, Percent, Shifted};

const STAT_NAMES: &[(u16, &str, StatFormat)] = &[
    (0, "Strength", Number),
    (1, "Energy", Number),
    (2, "Dexterity", Number),
    (3, "Vitality", Number),
    (4, "Stat Points", Number),
    (5, "Skill Points", Number),
    (6, "Life", Shifted),
    (7, "Maximum Life", Shifted),
    (8, "Mana", Shifted),
    (9, "Maximum Mana", Shifted),
    (10, "Stamina", Shifted),
    (11, "Maximum Stamina", Shifted),
    (12, "Level", Number),
    (13, "Experience", Number),
    (14, "Gold", Number),
    (15, "Stashed Gold", Number),
    (16, "Enhanced Defense", Percent),
    (17, "Enhanced Maximum Damage", Percent),
    (18, "Enhanced Minimum Damage", Percent),
    (19, "Attack Rating", Number),
    (20, "Chance to Block", Percent),
    (21, "Minimum Damage", Number),
    (22, "Maximum Damage", Number),
    (23, "Secondary Minimum Damage", Number),
    (24, "Secondary Maximum Damage", Number),
    (25, "Enhanced Damage", Percent),
    (26, "Mana Recovery", Number),
    (27, "Regenerate Mana", Percent),
    (28, "Heal Stamina", Percent),
    (29, "Last Experience", Hidden),
    (30, "Next Experience", Hidden),
    (31, "Defense", Number),
    (32, "Defense vs. Missile", Number),
    (33, "Defense vs. Melee", Number),
    (34, "Damage Reduced by", Number),
    (35, "Magic Damage Reduced by", Number),
    (36, "Damage Reduced by", Percent),
    (37, "Magic Resist", Percent),
    (38, "Maximum Magic Resist", Percent),
    (39, "Fire Resist", Percent),
    (40, "Maximum Fire Resist", Percent),
    (41, "Lightning Resist", Percent),
    (42, "Maximum Lightning Resist", Percent),
    (43, "Cold Resist", Percent),
    (44, "Maximum Cold Resist", Percent),
    (45, "Poison Resist", Percent),
    (46, "Maximum Poison Resist", Percent),
    (48, "Minimum Fire Damage", Number),
    (49, "Maximum Fire Damage", Number),
    (50, "Minimum Lightning Damage", Number),
    (51, "Maximum Lightning Damage", Number),
    (52, "Minimum Magic Damage", Number),
    (53, "Maximum Magic Damage", Number),
    (54, "Minimum Cold Damage", Number),
    (55, "Maximum Cold Damage", Number),
    (56, "Cold Length", Hidden),
    (57, "Minimum Poison Damage", Number),
    (58, "Maximum Poison Damage", Number),
    (59, "Poison Length", Hidden),
    (60, "Life Stolen per Hit", Percent),
    (62, "Mana Stolen per Hit", Percent),
    (67, "Velocity", Hidden),
    (68, "Attack Speed", Hidden),
    (70, "Quantity", Number),
    (72, "Durability", Number),
    (73, "Maximum Durability", Number),
    (74, "Replenish Life", Number),
    (75, "Enhanced Maximum Durability", Percent),
    (76, "Increase Maximum Life", Percent),
    (77, "Increase Maximum Mana", Percent),
    (78, "Attacker Takes Damage of", Number),
    (79, "Extra Gold from Monsters", Percent),
    (80, "Magic Find", Percent),
    (81, "Knockback", Number),
    (83, "to Class Skills", Number),
    (85, "Experience Gained", Percent),
    (86, "Life after each Kill", Number),
    (89, "Light Radius", Number),
    (91, "Requirements", Percent),
    (93, "Increased Attack Speed", Percent),
    (96, "Faster Run/Walk", Percent),
    (99, "Faster Hit Recovery", Percent),
    (102, "Faster Block Rate", Percent),
    (105, "Faster Cast Rate", Percent),
    (107, "to Skill", Number),
    (119, "Attack Rating Bonus", Percent),
    (127, "to All Skills", Number),
    (138, "Mana after each Kill", Number),
    (188, "to Skill Tab", Number),
    (194, "Sockets", Number),
];

/// Damage stats shown as a single `min-max` line
const DAMAGE_PAIRS: &[(u16, u16, &str)] = &[
    (21, 22, "Damage"),
    (48, 49, "Fire Damage"),
    (50, 51, "Lightning Damage"),
    (52, 53, "Magic Damage"),
    (54, 55, "Cold Damage"),
    (57, 58, "Poison Damage"),
];

const RESISTANCES: [u16; 4] = [39, 41, 43, 45];

/// A stat ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedStat {
    pub hi_id: u16,
    pub lo_id: u16,
    pub display: String,
    /// Rendered value; empty when the label already says everything
    pub value: String,
    #[serde(skip)]
    hidden: bool,
}

impl TranslatedStat {
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

fn lookup(lo_id: u16) -> Option<(&'static str, StatFormat)> {
    STAT_NAMES
        .iter()
        .find(|(id, _, _)| *id == lo_id)
        .map(|(_, name, format)| (*name, *format))
}

/// Translate one raw entry
pub fn translate_stat(entry: &AttributeEntry) -> TranslatedStat {
    let Some((name, format)) = lookup(entry.lo_id) else {
        return TranslatedStat {
            hi_id: entry.hi_id,
            lo_id: entry.lo_id,
            display: format!("Stat {}:{}", entry.lo_id, entry.hi_id),
            value: entry.value.to_string(),
            hidden: false,
        };
    };

    // Parameterised stats carry the skill / class / tab id in the hi word
    let display = if entry.hi_id != 0 {
        format!("{} #{}", name, entry.hi_id)
    } else {
        name.to_string()
    };
    let value = match format {
        Number | Hidden => entry.value.to_string(),
        Percent => format!("{}%", entry.value),
        Shifted => (entry.value >> 8).to_string(),
    };

    TranslatedStat {
        hi_id: entry.hi_id,
        lo_id: entry.lo_id,
        display,
        value,
        hidden: format == Hidden,
    }
}

/// Translate a stat list, dropping hidden stats and merging related lines
pub fn translate_stats(entries: &[AttributeEntry]) -> Vec<TranslatedStat> {
    let base = |lo_id: u16| {
        entries
            .iter()
            .find(|e| e.lo_id == lo_id && e.hi_id == 0)
            .map(|e| e.value)
    };

    let mut merged: Vec<u16> = Vec::new();
    let mut out = Vec::new();

    for &(min_id, max_id, label) in DAMAGE_PAIRS {
        if let (Some(min), Some(max)) = (base(min_id), base(max_id)) {
            out.push(TranslatedStat {
                hi_id: 0,
                lo_id: min_id,
                display: label.to_string(),
                value: format!("{min}-{max}"),
                hidden: false,
            });
            merged.extend([min_id, max_id]);
        }
    }

    let resists: Vec<Option<i64>> = RESISTANCES.iter().map(|id| base(*id)).collect();
    if let Some(Some(first)) = resists.first()
        && resists.iter().all(|r| *r == Some(*first))
    {
        out.push(TranslatedStat {
            hi_id: 0,
            lo_id: RESISTANCES[0],
            display: "All Resistances".to_string(),
            value: format!("{first}%"),
            hidden: false,
        });
        merged.extend(RESISTANCES);
    }

    let singles = entries
        .iter()
        .filter(|e| !(e.hi_id == 0 && merged.contains(&e.lo_id)))
        .map(translate_stat)
        .filter(|s| !s.is_hidden());

    let mut result: Vec<TranslatedStat> = singles.collect();
    result.extend(out);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hi_id: u16, lo_id: u16, value: i64) -> AttributeEntry {
        AttributeEntry {
            hi_id,
            lo_id,
            value,
        }
    }

    #[test]
    fn test_translate_known_stat() {
        let stat = translate_stat(&entry(0, 80, 35));
        assert_eq!(stat.display, "Magic Find");
        assert_eq!(stat.value, "35%");
    }

    #[test]
    fn test_translate_shifted_life() {
        let stat = translate_stat(&entry(0, 7, 420 << 8));
        assert_eq!(stat.display, "Maximum Life");
        assert_eq!(stat.value, "420");
    }

    #[test]
    fn test_translate_parameterised_and_unknown() {
        let stat = translate_stat(&entry(54, 107, 3));
        assert_eq!(stat.display, "to Skill #54");

        let stat = translate_stat(&entry(0, 999, 4));
        assert_eq!(stat.display, "Stat 999:0");
        assert_eq!(stat.value, "4");
    }

    #[test]
    fn test_translate_stats_merges_damage_and_resists() {
        let entries = [
            entry(0, 48, 5),
            entry(0, 49, 30),
            entry(0, 39, 20),
            entry(0, 41, 20),
            entry(0, 43, 20),
            entry(0, 45, 20),
            entry(0, 30, 1000),
            entry(0, 0, 10),
        ];
        let stats = translate_stats(&entries);

        let displays: Vec<&str> = stats.iter().map(|s| s.display.as_str()).collect();
        assert_eq!(displays, ["Strength", "Fire Damage", "All Resistances"]);
        assert_eq!(stats[1].value, "5-30");
        assert_eq!(stats[2].value, "20%");
    }

    #[test]
    fn test_translate_stats_keeps_uneven_resists() {
        let entries = [entry(0, 39, 20), entry(0, 41, 15)];
        let stats = translate_stats(&entries);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].display, "Fire Resist");
    }
}
