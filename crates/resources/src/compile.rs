use pal_core::logging::{log, LogCategory, LogLevel};
use pal_core::{PaletteResource, Rgb444, PALETTE_ENTRY_BYTES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ResConfig;
use crate::jasc::parse_jasc;
use crate::pack::{ResourcePack, PACK_MAGIC};
use crate::ResourceError;

/// A palette packed into register format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPalette {
    pub id: String,
    /// Little-endian RGB444 entries
    pub data: Vec<u8>,
}

impl CompiledPalette {
    pub fn from_colors(id: impl Into<String>, colors: &[Rgb444]) -> Self {
        Self {
            id: id.into(),
            data: colors.iter().flat_map(|c| c.to_le_bytes()).collect(),
        }
    }

    /// Entry count
    pub fn entries(&self) -> usize {
        self.data.len() / PALETTE_ENTRY_BYTES
    }

    /// Borrow as a loadable resource.
    pub fn as_resource(&self) -> PaletteResource<'_> {
        PaletteResource::from_bytes(&self.data)
    }
}

/// `build/palettes.json`: where each palette's data sits in the pack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    pub palettes: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub entries: usize,
    pub bytes: usize,
    /// Byte offset of the palette data inside the pack file
    pub offset: usize,
}

impl PackManifest {
    pub fn for_pack(pack: &ResourcePack) -> Self {
        let mut offset = PACK_MAGIC.len() + 4;
        let palettes = pack
            .palettes()
            .iter()
            .map(|p| {
                // id length byte, id, entry count
                offset += 1 + p.id.len() + 2;
                let entry = ManifestEntry {
                    id: p.id.clone(),
                    entries: p.entries(),
                    bytes: p.entries() * PALETTE_ENTRY_BYTES,
                    offset,
                };
                offset += entry.bytes;
                entry
            })
            .collect();
        Self { palettes }
    }
}

/// Compile every palette listed in `<project>/resources/config.json`.
///
/// Palette paths are relative to `<project>/resources/`. Writes
/// `<project>/build/palettes.bin` and `<project>/build/palettes.json` and
/// returns the pack.
pub fn compile_project(project_path: &Path) -> Result<ResourcePack, ResourceError> {
    let res_path = project_path.join("resources");
    let config = ResConfig::load(&res_path)?;

    let mut pack = ResourcePack::new();
    for def in &config.palettes {
        let palette = compile_palette(&res_path, &def.id, &def.path).map_err(|source| {
            ResourceError::Palette {
                id: def.id.clone(),
                source: Box::new(source),
            }
        })?;
        log(LogCategory::Resources, LogLevel::Info, || {
            format!(
                "Resources: compiled palette {} ({} entries)",
                palette.id,
                palette.entries()
            )
        });
        pack.push(palette)?;
    }

    let build_path = project_path.join("build");
    fs::create_dir_all(&build_path).map_err(|e| ResourceError::io(&build_path, e))?;

    pack.write_to(&build_path.join("palettes.bin"))?;

    let manifest_path: PathBuf = build_path.join("palettes.json");
    let manifest = serde_json::to_string_pretty(&PackManifest::for_pack(&pack))?;
    fs::write(&manifest_path, manifest).map_err(|e| ResourceError::io(&manifest_path, e))?;

    Ok(pack)
}

fn compile_palette(res_path: &Path, id: &str, path: &str) -> Result<CompiledPalette, ResourceError> {
    let file = res_path.join(path);
    let text = fs::read_to_string(&file).map_err(|e| ResourceError::io(&file, e))?;
    let colors = parse_jasc(&text)?;
    Ok(CompiledPalette::from_colors(id, &colors))
}
