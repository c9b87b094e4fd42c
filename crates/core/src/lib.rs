//! Palette register loading primitives.
//!
//! - [`storage`]: the register transfer primitive and in-memory register banks
//! - [`graphics`]: palette resources, the palette loader and the entry color format
//! - [`logging`]: category-gated, rate-limited logging shared by the toolkit

pub mod graphics;
pub mod logging;
pub mod storage;

pub use graphics::{PaletteError, PaletteLoader, PaletteResource, Rgb444, PALETTE_ENTRY_BYTES};
pub use storage::{
    RecordingTransfer, RegisterBank, RegisterTarget, RegisterTransfer, TransferRequest,
    PALETTE_BANK_BYTES,
};
