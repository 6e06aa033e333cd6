pub mod layout;
mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use process::*;
pub use reader::{MemoryReader, ReadMemory, decode_windows_1252};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
