//! Palette resource toolchain.
//!
//! Turns JASC-PAL text palettes listed in a project's `resources/config.json`
//! into packed RGB444 palettes, and reads/writes the binary palette pack the
//! loaders consume.

mod compile;
mod config;
mod jasc;
mod pack;

use std::path::PathBuf;
use thiserror::Error;

pub use compile::{compile_project, CompiledPalette, ManifestEntry, PackManifest};
pub use config::{PaletteDef, ResConfig};
pub use jasc::parse_jasc;
pub use pack::{ResourcePack, PACK_MAGIC};

/// Resource toolchain errors
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid resource config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Failed to compile palette \"{id}\"")]
    Palette {
        id: String,
        #[source]
        source: Box<ResourceError>,
    },
    #[error("Duplicate palette id \"{0}\"")]
    DuplicateId(String),
    #[error("Palette id \"{0}\" must be 1 to 255 bytes long")]
    InvalidId(String),
    #[error("Palette \"{id}\" has {entries} entries, the pack format allows 65535")]
    TooManyEntries { id: String, entries: usize },
    #[error("Not a palette pack (bad magic)")]
    BadMagic,
    #[error("Palette pack truncated at byte {0}")]
    Truncated(usize),
    #[error("Palette pack id at byte {0} is not valid UTF-8")]
    InvalidUtf8(usize),
    #[error("Failed to encode manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl ResourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResourceError::Io {
            path: path.into(),
            source,
        }
    }
}
