mod enums;
mod item;
mod kills;
mod player;
mod stat_map;
mod state;
pub(crate) mod stats;
mod strings;

pub use enums::*;
pub use item::*;
pub use kills::*;
pub use player::*;
pub use stat_map::*;
pub use state::*;
pub use stats::*;
pub use strings::*;
