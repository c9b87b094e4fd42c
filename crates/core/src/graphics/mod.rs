//! Palette color format and palette register loading.

pub mod color;
pub mod palette;

pub use color::Rgb444;
pub use palette::{PaletteError, PaletteLoader, PaletteResource, PALETTE_ENTRY_BYTES};
