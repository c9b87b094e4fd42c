use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::ResourceError;

/// One palette to compile: `path` is relative to the resources directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDef {
    pub id: String,
    pub path: String,
}

/// Contents of `resources/config.json`.
///
/// Sections other than `palettes` belong to other resource compilers and
/// are ignored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResConfig {
    #[serde(default)]
    pub palettes: Vec<PaletteDef>,
}

impl ResConfig {
    /// Config file name inside the resources directory
    pub const FILE_NAME: &'static str = "config.json";

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load `config.json` from `res_path`.
    pub fn load(res_path: &Path) -> Result<Self, ResourceError> {
        let path = res_path.join(Self::FILE_NAME);
        let text = fs::read_to_string(&path).map_err(|e| ResourceError::io(&path, e))?;
        Self::from_json(&text).map_err(|source| ResourceError::Config { path, source })
    }
}
