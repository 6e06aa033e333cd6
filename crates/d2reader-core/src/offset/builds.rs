//! Per-build layouts.
//!
//! Each supported build is a static record of module-relative offsets.
//! Resolution adds the module bases of the attached process; it is a pure
//! lookup with no hidden state, so resolving the same build against the
//! same bases always yields an identical table.

use tracing::debug;

use crate::error::{Error, Result};
use crate::offset::{
    BuildIdentifier, GameModule, ModuleBases, OffsetTable, StringTables, TierTables,
};

/// An offset from the base of a game module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleOffset {
    pub module: GameModule,
    pub offset: u32,
}

const fn at(module: GameModule, offset: u32) -> ModuleOffset {
    ModuleOffset { module, offset }
}

impl ModuleOffset {
    fn resolve(&self, bases: &ModuleBases) -> Result<u64> {
        bases
            .get(self.module)
            .map(|base| base + u64::from(self.offset))
            .ok_or_else(|| Error::ModuleNotLoaded(self.module.file_name().to_string()))
    }
}

/// (indexer, address) table pointers for base, patch and expansion tiers
pub type StringTierLayout = [(ModuleOffset, ModuleOffset); 3];

/// Module-relative layout of one build
#[derive(Debug, Clone, Copy)]
pub struct BuildLayout {
    pub build: &'static str,
    /// Modules that must be mapped before any offset is meaningful
    pub requires: &'static [GameModule],
    pub world: ModuleOffset,
    pub players_x: ModuleOffset,
    pub player_unit: ModuleOffset,
    pub pause_menu: Option<ModuleOffset>,
    pub unit_slots: ModuleOffset,
    pub slot_bias: u32,
    pub hovered_item: Option<ModuleOffset>,
    pub item_descriptions: ModuleOffset,
    pub strings: Option<StringTierLayout>,
}

use GameModule::{Client, Common, Executable as Exe, Game, Lang, Net};

pub static KNOWN_BUILDS: &[BuildLayout] = &[
    BuildLayout {
        build: "1.13c",
        requires: &[Client, Game, Net],
        world: at(Game, 0x111C24),
        players_x: at(Game, 0x111C1C),
        player_unit: at(Client, 0x10A60C),
        pause_menu: Some(at(Client, 0xFADA4)),
        unit_slots: at(Client, 0x10A808),
        slot_bias: 0,
        hovered_item: Some(at(Client, 0x11BC38)),
        item_descriptions: at(Common, 0x9FB94),
        strings: Some([
            (at(Lang, 0x10A64), at(Lang, 0x10A68)),
            (at(Lang, 0x10A80), at(Lang, 0x10A6C)),
            (at(Lang, 0x10A84), at(Lang, 0x10A70)),
        ]),
    },
    BuildLayout {
        build: "1.13d",
        requires: &[Client, Game, Net],
        world: at(Game, 0x111C10),
        players_x: at(Game, 0x111C44),
        player_unit: at(Client, 0x101024),
        pause_menu: Some(at(Client, 0x11C8B4)),
        unit_slots: at(Client, 0x1049B8),
        slot_bias: 0,
        hovered_item: Some(at(Client, 0x11CB28)),
        item_descriptions: at(Common, 0xA4CB0),
        strings: None,
    },
    BuildLayout {
        build: "1.14b",
        requires: &[],
        world: at(Exe, 0x47BD78),
        players_x: at(Exe, 0x47BDB0),
        player_unit: at(Exe, 0x39DEFC),
        pause_menu: None,
        unit_slots: at(Exe, 0x39DEF8),
        slot_bias: 0x80,
        hovered_item: None,
        item_descriptions: at(Exe, 0x564A98),
        strings: None,
    },
    BuildLayout {
        build: "1.14c",
        requires: &[],
        world: at(Exe, 0x47ACC0),
        players_x: at(Exe, 0x47ACF8),
        player_unit: at(Exe, 0x39CEFC),
        pause_menu: None,
        unit_slots: at(Exe, 0x39CEF8),
        slot_bias: 0x80,
        hovered_item: None,
        item_descriptions: at(Exe, 0x5639E0),
        strings: None,
    },
    BuildLayout {
        build: "1.14d",
        requires: &[],
        world: at(Exe, 0x483D38),
        players_x: at(Exe, 0x483D70),
        player_unit: at(Exe, 0x3A5E74),
        pause_menu: Some(at(Exe, 0x3A27E4)),
        unit_slots: at(Exe, 0x3A5E70),
        slot_bias: 0x80,
        hovered_item: None,
        item_descriptions: at(Exe, 0x56CA58),
        strings: None,
    },
];

impl BuildLayout {
    /// Look up the layout of a build, if it is one we know
    pub fn find(build: &BuildIdentifier) -> Option<&'static BuildLayout> {
        KNOWN_BUILDS.iter().find(|layout| layout.build == build.as_str())
    }

    /// Anchor every offset at the given module bases
    pub fn resolve(&self, bases: &ModuleBases) -> Result<OffsetTable> {
        if let Some(missing) = self.requires.iter().find(|m| bases.get(**m).is_none()) {
            return Err(Error::ModuleNotLoaded(missing.file_name().to_string()));
        }

        let optional =
            |offset: Option<ModuleOffset>| offset.map(|o| o.resolve(bases)).transpose();

        let strings = match &self.strings {
            Some([base, patch, expansion]) => {
                let tier = |(indexer, address): &(ModuleOffset, ModuleOffset)| {
                    Ok::<_, Error>(TierTables {
                        indexer: indexer.resolve(bases)?,
                        address: address.resolve(bases)?,
                    })
                };
                Some(StringTables {
                    base: tier(base)?,
                    patch: tier(patch)?,
                    expansion: tier(expansion)?,
                })
            }
            None => None,
        };

        Ok(OffsetTable {
            build: self.build.to_string(),
            world: self.world.resolve(bases)?,
            players_x: self.players_x.resolve(bases)?,
            player_unit: self.player_unit.resolve(bases)?,
            pause_menu: optional(self.pause_menu)?,
            unit_slots: self.unit_slots.resolve(bases)?,
            slot_bias: self.slot_bias,
            hovered_item: optional(self.hovered_item)?,
            item_descriptions: self.item_descriptions.resolve(bases)?,
            strings,
        })
    }
}

/// Resolve a build to its offset table
///
/// Unknown builds yield `Error::UnsupportedBuild`; a known build whose
/// modules are not all mapped yet yields `Error::ModuleNotLoaded`.
pub fn resolve_build(build: &BuildIdentifier, bases: &ModuleBases) -> Result<OffsetTable> {
    let Some(layout) = BuildLayout::find(build) else {
        debug!("No offsets known for build {}", build);
        return Err(Error::UnsupportedBuild(build.to_string()));
    };

    let offsets = layout.resolve(bases)?;
    debug!(
        "Resolved {}: player_unit={:#x}, unit_slots={:#x}, strings={}",
        offsets.build,
        offsets.player_unit,
        offsets.unit_slots,
        offsets.strings.is_some()
    );
    Ok(offsets)
}

/// Names of every build with a known layout
pub fn supported_builds() -> impl Iterator<Item = &'static str> {
    KNOWN_BUILDS.iter().map(|layout| layout.build)
}
