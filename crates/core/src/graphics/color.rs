//! Palette entry color format.
//!
//! Palette registers hold 12-bit colors packed into 16 bits as `0x0BGR`
//! (4 bits per channel, top nibble unused), stored little-endian.

use serde::{Deserialize, Serialize};

/// A packed RGB444 palette entry (`0x0BGR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb444(u16);

impl Rgb444 {
    /// Wrap a raw register value. The unused top nibble is cleared.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw & 0x0FFF)
    }

    /// Quantize an 8-bit-per-channel color by dropping the low nibble of
    /// each channel.
    ///
    /// ```
    /// use pal_core::graphics::Rgb444;
    ///
    /// assert_eq!(Rgb444::from_rgb888(0xFF, 0x80, 0x10).raw(), 0x18F);
    /// ```
    #[inline]
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        let r = (r >> 4) as u16;
        let g = (g >> 4) as u16;
        let b = (b >> 4) as u16;
        Self(r | (g << 4) | (b << 8))
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        ((self.0 >> 4) & 0x0F) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        ((self.0 >> 8) & 0x0F) as u8
    }

    /// Register byte order.
    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self::from_raw(u16::from_le_bytes(bytes))
    }

    /// Expand to opaque ARGB8888 (0xAARRGGBB), scaling each nibble by 17 so
    /// 0x0 maps to 0x00 and 0xF maps to 0xFF.
    pub fn to_argb8888(self) -> u32 {
        let r = self.red() as u32 * 17;
        let g = self.green() as u32 * 17;
        let b = self.blue() as u32 * 17;
        0xFF000000 | (r << 16) | (g << 8) | b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb888_quantization() {
        // Low nibbles are dropped, not rounded
        let c = Rgb444::from_rgb888(0x1F, 0x2F, 0x3F);
        assert_eq!(c.raw(), 0x321);
        assert_eq!(c.red(), 1);
        assert_eq!(c.green(), 2);
        assert_eq!(c.blue(), 3);

        assert_eq!(Rgb444::from_rgb888(0, 0, 0).raw(), 0x000);
        assert_eq!(Rgb444::from_rgb888(255, 255, 255).raw(), 0xFFF);
    }

    #[test]
    fn test_from_raw_masks_top_nibble() {
        assert_eq!(Rgb444::from_raw(0xF123).raw(), 0x123);
    }

    #[test]
    fn test_register_byte_order() {
        let c = Rgb444::from_raw(0x0ABC);
        assert_eq!(c.to_le_bytes(), [0xBC, 0x0A]);
        assert_eq!(Rgb444::from_le_bytes([0xBC, 0x0A]), c);
    }

    #[test]
    fn test_argb_expansion() {
        assert_eq!(Rgb444::from_raw(0x000).to_argb8888(), 0xFF000000);
        assert_eq!(Rgb444::from_raw(0xFFF).to_argb8888(), 0xFFFFFFFF);
        // Pure red lives in the low nibble
        assert_eq!(Rgb444::from_raw(0x00F).to_argb8888(), 0xFFFF0000);
        assert_eq!(Rgb444::from_raw(0xF00).to_argb8888(), 0xFF0000FF);
    }
}
