//! Build identification.
//!
//! The game's executable carries a four-part file version that maps to a
//! patch name (`1.14d`, ...). D2SE hosts older patches in-process and
//! instead records the patch name as a string in its own image.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::memory::ReadMemory;
use crate::memory::layout::exe;

/// File versions of known executables and their patch names
const PATCH_BY_FILE_VERSION: &[(&str, &str)] = &[
    ("1.14.3.71", "1.14d"),
    ("1.14.2.70", "1.14c"),
    ("1.14.1.68", "1.14b"),
    ("1.0.13.64", "1.13d"),
    ("1.0.13.60", "1.13c"),
];

/// Patches D2SE can host; anything else it reports is treated as 1.13c
const D2SE_PATCHES: &[&str] = &[
    "1.07", "1.08", "1.09b", "1.09d", "1.10f", "1.11b", "1.12a", "1.13c",
];
const D2SE_DEFAULT_PATCH: &str = "1.13c";

/// Four-part executable file version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl FileVersion {
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Build from the `FileVersionMS` / `FileVersionLS` resource dwords
    pub fn from_dwords(ms: u32, ls: u32) -> Self {
        Self::new(
            (ms >> 16) as u16,
            (ms & 0xFFFF) as u16,
            (ls >> 16) as u16,
            (ls & 0xFFFF) as u16,
        )
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Opaque name of a game build
///
/// Any string is a valid identifier; whether a layout exists for it is
/// decided by `offset::resolve_build`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildIdentifier(String);

impl BuildIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map an executable version to its patch name, keeping unknown
    /// versions as their dotted text
    pub fn from_file_version(version: FileVersion) -> Self {
        let raw = version.to_string();
        PATCH_BY_FILE_VERSION
            .iter()
            .find(|(file_version, _)| *file_version == raw)
            .map(|(_, patch)| Self::new(*patch))
            .unwrap_or(Self(raw))
    }

    /// Interpret the patch string D2SE reports
    pub fn from_d2se_patch(patch: &str) -> Self {
        let patch = patch.trim();
        if D2SE_PATCHES.contains(&patch) {
            Self::new(patch)
        } else {
            debug!("Unknown D2SE patch {:?}, assuming {}", patch, D2SE_DEFAULT_PATCH);
            Self::new(D2SE_DEFAULT_PATCH)
        }
    }

    /// Read the hosted patch name out of a D2SE process
    pub fn read_d2se<R: ReadMemory>(reader: &R) -> Result<Self> {
        let address = reader.base_address() + exe::D2SE_PATCH_STRING;
        let patch = reader.read_string(address, exe::D2SE_PATCH_MAX_LEN)?;
        Ok(Self::from_d2se_patch(&patch))
    }
}

impl fmt::Display for BuildIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
