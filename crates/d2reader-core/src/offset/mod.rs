mod builds;
mod collection;
mod modules;
mod version;

pub use builds::*;
pub use collection::*;
pub use modules::*;
pub use version::*;
