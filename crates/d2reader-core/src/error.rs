use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Unsupported build: {0}")]
    UnsupportedBuild(String),

    #[error("Module not loaded: {0}")]
    ModuleNotLoaded(String),

    #[error("Failed to query file version: {0}")]
    VersionQueryFailed(String),

    #[error("Not in game")]
    NotInGame,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a failed read at `address`
    pub fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::MemoryReadFailed {
            address,
            message: message.into(),
        }
    }

    /// Check if this error means the build has no known layout
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnsupportedBuild(_))
    }

    /// Check if this error came from the foreign process not being readable
    ///
    /// These are expected while the game sits in menus or loads; callers
    /// usually fold them into a neutral result.
    pub fn is_memory_access(&self) -> bool {
        matches!(self, Error::MemoryReadFailed { .. } | Error::NotInGame)
    }
}
