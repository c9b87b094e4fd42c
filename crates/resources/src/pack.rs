//! Binary palette pack.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! magic     8 bytes   "PALPACK1"
//! count     u32
//! count × {
//!     id_len    u8
//!     id        id_len bytes, UTF-8
//!     entries   u16
//!     data      entries × 2 bytes, packed RGB444
//! }
//! ```

use pal_core::logging::{log, LogCategory, LogLevel};
use pal_core::PALETTE_ENTRY_BYTES;
use std::fs;
use std::path::Path;

use crate::compile::CompiledPalette;
use crate::ResourceError;

pub const PACK_MAGIC: &[u8; 8] = b"PALPACK1";

/// Ordered set of compiled palettes with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePack {
    palettes: Vec<CompiledPalette>,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a palette, rejecting ids already present.
    pub fn push(&mut self, palette: CompiledPalette) -> Result<(), ResourceError> {
        if self.get(&palette.id).is_some() {
            return Err(ResourceError::DuplicateId(palette.id));
        }
        self.palettes.push(palette);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CompiledPalette> {
        self.palettes.iter().find(|p| p.id == id)
    }

    pub fn palettes(&self) -> &[CompiledPalette] {
        &self.palettes
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Encode the pack. Fails if an id or entry count does not fit the format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ResourceError> {
        let mut out = Vec::new();
        out.extend_from_slice(PACK_MAGIC);
        out.extend_from_slice(&(self.palettes.len() as u32).to_le_bytes());

        for palette in &self.palettes {
            let id_len = u8::try_from(palette.id.len())
                .ok()
                .filter(|&len| len > 0)
                .ok_or_else(|| ResourceError::InvalidId(palette.id.clone()))?;
            let entries = u16::try_from(palette.entries()).map_err(|_| {
                ResourceError::TooManyEntries {
                    id: palette.id.clone(),
                    entries: palette.entries(),
                }
            })?;

            out.push(id_len);
            out.extend_from_slice(palette.id.as_bytes());
            out.extend_from_slice(&entries.to_le_bytes());
            out.extend_from_slice(&palette.data[..palette.entries() * PALETTE_ENTRY_BYTES]);
        }

        Ok(out)
    }

    /// Decode a pack produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ResourceError> {
        let mut reader = Reader { bytes, pos: 0 };

        if reader.take(PACK_MAGIC.len())? != PACK_MAGIC {
            return Err(ResourceError::BadMagic);
        }
        let count = u32::from_le_bytes(reader.array()?);

        let mut pack = ResourcePack::new();
        for _ in 0..count {
            let id_len = reader.take(1)?[0] as usize;
            let id_pos = reader.pos;
            let id = std::str::from_utf8(reader.take(id_len)?)
                .map_err(|_| ResourceError::InvalidUtf8(id_pos))?
                .to_string();
            let entries = u16::from_le_bytes(reader.array()?) as usize;
            let data = reader.take(entries * PALETTE_ENTRY_BYTES)?.to_vec();
            pack.push(CompiledPalette { id, data })?;
        }

        if reader.pos != bytes.len() {
            log(LogCategory::Resources, LogLevel::Warn, || {
                format!(
                    "Resources: {} trailing bytes after palette pack",
                    bytes.len() - reader.pos
                )
            });
        }

        Ok(pack)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ResourceError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| ResourceError::io(path, e))
    }

    pub fn read_from(path: &Path) -> Result<Self, ResourceError> {
        let bytes = fs::read(path).map_err(|e| ResourceError::io(path, e))?;
        Self::from_bytes(&bytes)
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], ResourceError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(ResourceError::Truncated(self.bytes.len()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ResourceError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
