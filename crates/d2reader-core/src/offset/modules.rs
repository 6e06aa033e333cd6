use std::collections::HashMap;

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::memory::ModuleInfo;

/// Image a build-relative offset is anchored to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, IntoStaticStr, Display,
)]
pub enum GameModule {
    /// The main executable; 1.14 merged every DLL into it
    #[strum(serialize = "exe")]
    Executable,
    #[strum(serialize = "d2client.dll")]
    Client,
    #[strum(serialize = "d2game.dll")]
    Game,
    #[strum(serialize = "d2net.dll")]
    Net,
    #[strum(serialize = "d2common.dll")]
    Common,
    #[strum(serialize = "d2lang.dll")]
    Lang,
}

impl GameModule {
    pub fn file_name(&self) -> &'static str {
        self.into()
    }

    fn from_file_name(name: &str) -> Option<Self> {
        Self::iter()
            .filter(|m| *m != Self::Executable)
            .find(|m| m.file_name().eq_ignore_ascii_case(name))
    }
}

/// Base addresses of the game modules loaded in one process
#[derive(Debug, Clone, Default)]
pub struct ModuleBases {
    bases: HashMap<GameModule, u64>,
    plugy: bool,
}

impl ModuleBases {
    /// Collect bases from a module listing, with `exe_base` as the executable
    pub fn from_modules<'a>(
        exe_base: u64,
        modules: impl IntoIterator<Item = &'a ModuleInfo>,
    ) -> Self {
        let mut bases = HashMap::new();
        bases.insert(GameModule::Executable, exe_base);
        let mut plugy = false;

        for module in modules {
            if module.name.eq_ignore_ascii_case("plugy.dll") {
                plugy = true;
            } else if let Some(game_module) = GameModule::from_file_name(&module.name) {
                bases.insert(game_module, module.base_address);
            }
        }

        Self { bases, plugy }
    }

    pub fn with(mut self, module: GameModule, base: u64) -> Self {
        self.bases.insert(module, base);
        self
    }

    pub fn get(&self, module: GameModule) -> Option<u64> {
        self.bases.get(&module).copied()
    }

    /// Whether the PlugY mod is loaded into the process
    pub fn has_plugy(&self) -> bool {
        self.plugy
    }
}
