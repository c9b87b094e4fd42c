//! Loading palette resources into the palette register bank.
//!
//! A palette resource is a borrowed run of packed 2-byte entries. Loading it
//! is a single register transfer: the whole resource, or a contiguous range
//! of its entries, copied to the palette bank at a byte offset.
//!
//! Two families of loads are provided:
//!
//! - [`PaletteLoader::load_palette`] / [`PaletteLoader::load_palette_region`]
//!   do no validation and hand the request straight to the transfer. A source
//!   range outside the resource, or one whose byte bounds overflow `usize`,
//!   panics; a destination past the end of the bank is whatever the transfer
//!   does with it.
//! - [`PaletteLoader::try_load_palette`] / [`PaletteLoader::try_load_palette_region`]
//!   validate both sides first and issue nothing on failure.

use crate::logging::{log, LogCategory, LogLevel};
use crate::storage::{RegisterTarget, RegisterTransfer};
use std::ops::Range;
use thiserror::Error;

use super::color::Rgb444;

/// Width of one palette entry in bytes.
pub const PALETTE_ENTRY_BYTES: usize = 2;

/// Checked palette load failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("Resource declares {size} entries but holds only {available} bytes")]
    ResourceTooShort { size: usize, available: usize },
    #[error("Region {start}+{len} is outside a resource of {size} entries")]
    RegionOutOfBounds { start: usize, len: usize, size: usize },
    #[error("Write of {len} bytes at offset {offset} exceeds {capacity}-byte register bank")]
    RegisterOverflow {
        offset: u8,
        len: usize,
        capacity: usize,
    },
}

/// Read-only view of caller-owned palette data.
///
/// `size` counts entries, not bytes. The loader borrows the resource for the
/// duration of a call and never keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteResource<'a> {
    data: &'a [u8],
    size: usize,
}

impl<'a> PaletteResource<'a> {
    /// Describe `size` entries stored in `data`.
    ///
    /// Nothing is validated here; `data` shorter than `size` entries is
    /// caught by the checked loads and panics in the unchecked ones.
    pub const fn new(data: &'a [u8], size: usize) -> Self {
        Self { data, size }
    }

    /// Resource covering every whole entry in `data`.
    pub const fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            data,
            size: data.len() / PALETTE_ENTRY_BYTES,
        }
    }

    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Entry count
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Size of the resource in bytes.
    ///
    /// Panics if the declared size does not fit in `usize` bytes.
    pub const fn byte_len(&self) -> usize {
        match self.size.checked_mul(PALETTE_ENTRY_BYTES) {
            Some(len) => len,
            None => panic!("palette resource size overflows usize bytes"),
        }
    }

    /// Decode entry `index`, if the data covers it.
    pub fn entry(&self, index: usize) -> Option<Rgb444> {
        if index >= self.size {
            return None;
        }
        let range = entry_span(index, 1)?;
        let bytes = self.data.get(range)?;
        Some(Rgb444::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Byte range of entries `[start, start + len)`, or `None` when it is not
    /// inside the declared size.
    fn region_bytes(&self, start: usize, len: usize) -> Option<Range<usize>> {
        let end = start.checked_add(len)?;
        if end > self.size {
            return None;
        }
        entry_span(start, len)
    }
}

/// Byte range covered by entries `[start, start + len)`, `None` on overflow.
fn entry_span(start: usize, len: usize) -> Option<Range<usize>> {
    let first = start.checked_mul(PALETTE_ENTRY_BYTES)?;
    let count = len.checked_mul(PALETTE_ENTRY_BYTES)?;
    Some(first..first.checked_add(count)?)
}

/// Issues palette loads against a register transfer.
///
/// The loader holds no state of its own; it owns (or borrows, via
/// `&mut T`) the transfer so that every load is exactly one
/// `copy_to_register` call.
pub struct PaletteLoader<T: RegisterTransfer> {
    transfer: T,
}

impl<T: RegisterTransfer> PaletteLoader<T> {
    pub fn new(transfer: T) -> Self {
        Self { transfer }
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    pub fn into_inner(self) -> T {
        self.transfer
    }

    /// Copy the whole resource to the palette bank starting at `offset`.
    ///
    /// Writes `resource.byte_len()` bytes. Panics if the resource data is
    /// shorter than its declared size.
    #[inline]
    pub fn load_palette(&mut self, resource: &PaletteResource<'_>, offset: u8) {
        let source = &resource.data[..resource.byte_len()];
        self.issue(offset, source);
    }

    /// Copy entries `[region_start, region_start + region_size)` to the
    /// palette bank starting at `offset`.
    ///
    /// Writes `region_size * PALETTE_ENTRY_BYTES` bytes. A zero-size region
    /// issues a zero-length transfer. Panics if the region is not inside the
    /// resource data.
    #[inline]
    pub fn load_palette_region(
        &mut self,
        resource: &PaletteResource<'_>,
        offset: u8,
        region_start: usize,
        region_size: usize,
    ) {
        let span = match entry_span(region_start, region_size) {
            Some(span) => span,
            None => panic!(
                "palette region {}+{} overflows usize bytes",
                region_start, region_size
            ),
        };
        self.issue(offset, &resource.data[span]);
    }

    /// [`load_palette`](Self::load_palette) with both sides validated first.
    pub fn try_load_palette(
        &mut self,
        resource: &PaletteResource<'_>,
        offset: u8,
    ) -> Result<(), PaletteError> {
        let source = checked_source(resource, 0, resource.size)?;
        self.check_destination(offset, source.len())?;
        self.issue(offset, source);
        Ok(())
    }

    /// [`load_palette_region`](Self::load_palette_region) with both sides
    /// validated first.
    pub fn try_load_palette_region(
        &mut self,
        resource: &PaletteResource<'_>,
        offset: u8,
        region_start: usize,
        region_size: usize,
    ) -> Result<(), PaletteError> {
        let source = checked_source(resource, region_start, region_size)?;
        self.check_destination(offset, source.len())?;
        self.issue(offset, source);
        Ok(())
    }

    fn check_destination(&self, offset: u8, len: usize) -> Result<(), PaletteError> {
        let capacity = self.transfer.capacity(RegisterTarget::Palette);
        if offset as usize + len > capacity {
            log(LogCategory::Palette, LogLevel::Debug, || {
                format!(
                    "Palette: rejected {} bytes at offset {:02X}, bank holds {}",
                    len, offset, capacity
                )
            });
            return Err(PaletteError::RegisterOverflow {
                offset,
                len,
                capacity,
            });
        }
        Ok(())
    }

    #[inline]
    fn issue(&mut self, offset: u8, source: &[u8]) {
        log(LogCategory::Palette, LogLevel::Trace, || {
            format!(
                "Palette: load {} entries at offset {:02X}",
                source.len() / PALETTE_ENTRY_BYTES,
                offset
            )
        });
        self.transfer
            .copy_to_register(RegisterTarget::Palette, offset, source);
    }
}

fn checked_source<'a>(
    resource: &PaletteResource<'a>,
    start: usize,
    len: usize,
) -> Result<&'a [u8], PaletteError> {
    let range = resource
        .region_bytes(start, len)
        .ok_or(PaletteError::RegionOutOfBounds {
            start,
            len,
            size: resource.size,
        })?;
    // The declared size may overstate the data; both must hold.
    resource
        .data
        .get(range)
        .ok_or(PaletteError::ResourceTooShort {
            size: resource.size,
            available: resource.data.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{RecordingTransfer, RegisterBank, TransferRequest};

    const DATA: [u8; 8] = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];

    fn recorder() -> PaletteLoader<RecordingTransfer> {
        PaletteLoader::new(RecordingTransfer::new())
    }

    #[test]
    fn test_full_load_issues_single_request() {
        let res = PaletteResource::new(&DATA, 4);
        let mut loader = recorder();

        loader.load_palette(&res, 2);

        assert_eq!(
            loader.transfer().requests(),
            &[TransferRequest {
                target: RegisterTarget::Palette,
                offset: 2,
                bytes: DATA.to_vec(),
            }]
        );
    }

    #[test]
    fn test_region_load_advances_by_entries() {
        let res = PaletteResource::new(&DATA, 4);
        let mut loader = recorder();

        loader.load_palette_region(&res, 0, 2, 1);

        let requests = loader.transfer().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].offset, 0);
        assert_eq!(requests[0].bytes, vec![0x04, 0x05]);
        assert_eq!(requests[0].byte_count(), 2);
    }

    #[test]
    fn test_zero_size_region_is_empty_write() {
        let res = PaletteResource::new(&DATA, 4);
        let mut loader = recorder();

        loader.load_palette_region(&res, 7, 4, 0);
        loader.try_load_palette_region(&res, 7, 4, 0).unwrap();

        let requests = loader.transfer().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.bytes.is_empty() && r.offset == 7));
    }

    #[test]
    fn test_loads_are_idempotent() {
        let res = PaletteResource::new(&DATA, 4);
        let mut loader = recorder();

        loader.load_palette_region(&res, 3, 1, 2);
        loader.load_palette_region(&res, 3, 1, 2);

        let requests = loader.transfer().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }

    #[test]
    fn test_full_load_ignores_trailing_data() {
        // Only the declared entries are copied
        let res = PaletteResource::new(&DATA, 3);
        let mut loader = recorder();

        loader.load_palette(&res, 0);

        assert_eq!(loader.transfer().requests()[0].bytes, DATA[..6].to_vec());
    }

    #[test]
    #[should_panic]
    fn test_unchecked_region_past_data_panics() {
        let res = PaletteResource::new(&DATA, 4);
        recorder().load_palette_region(&res, 0, 3, 2);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn test_unchecked_region_start_overflow_panics() {
        // The byte offset wraps to 0 without checked arithmetic
        let res = PaletteResource::new(&DATA, 4);
        recorder().load_palette_region(&res, 0, usize::MAX / 2 + 1, 1);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn test_unchecked_region_size_overflow_panics() {
        let res = PaletteResource::new(&DATA, 4);
        recorder().load_palette_region(&res, 0, 0, usize::MAX / 2 + 1);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn test_unchecked_full_load_size_overflow_panics() {
        let res = PaletteResource::new(&DATA, usize::MAX / 2 + 1);
        recorder().load_palette(&res, 0);
    }

    #[test]
    fn test_huge_declared_size_is_rejected_when_checked() {
        let res = PaletteResource::new(&DATA, usize::MAX / 2 + 1);
        let mut loader = recorder();

        assert!(loader.try_load_palette(&res, 0).is_err());
        assert!(loader
            .try_load_palette_region(&res, 0, usize::MAX / 2, 1)
            .is_err());
        assert_eq!(res.entry(usize::MAX / 2), None);
        assert!(loader.transfer().requests().is_empty());
    }

    #[test]
    fn test_checked_region_out_of_bounds() {
        let res = PaletteResource::new(&DATA, 4);
        let mut loader = recorder();

        let err = loader.try_load_palette_region(&res, 0, 3, 2).unwrap_err();
        assert_eq!(
            err,
            PaletteError::RegionOutOfBounds {
                start: 3,
                len: 2,
                size: 4
            }
        );

        let err = loader
            .try_load_palette_region(&res, 0, usize::MAX, 1)
            .unwrap_err();
        assert!(matches!(err, PaletteError::RegionOutOfBounds { .. }));

        assert!(loader.transfer().requests().is_empty());
    }

    #[test]
    fn test_checked_resource_too_short() {
        let res = PaletteResource::new(&DATA[..5], 4);
        let mut loader = recorder();

        assert_eq!(
            loader.try_load_palette(&res, 0),
            Err(PaletteError::ResourceTooShort {
                size: 4,
                available: 5
            })
        );
        // A region that fits in the data is still fine
        loader.try_load_palette_region(&res, 0, 0, 2).unwrap();
        assert_eq!(loader.transfer().requests().len(), 1);
    }

    #[test]
    fn test_checked_register_overflow() {
        let res = PaletteResource::new(&DATA, 4);
        let mut loader = PaletteLoader::new(RecordingTransfer::with_palette_capacity(10));

        loader.try_load_palette(&res, 2).unwrap();
        assert_eq!(
            loader.try_load_palette(&res, 3),
            Err(PaletteError::RegisterOverflow {
                offset: 3,
                len: 8,
                capacity: 10
            })
        );
        assert_eq!(loader.transfer().requests().len(), 1);
    }

    #[test]
    fn test_load_into_register_bank() {
        let res = PaletteResource::from_bytes(&DATA);
        let mut bank = RegisterBank::with_palette_size(16);

        {
            let mut loader = PaletteLoader::new(&mut bank);
            loader.load_palette(&res, 4);
            loader.load_palette_region(&res, 0, 3, 1);
        }

        assert_eq!(
            bank.palette(),
            &[
                0x06, 0x07, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x00,
                0x00, 0x00, 0x00
            ]
        );
    }

    #[test]
    fn test_resource_entries() {
        let res = PaletteResource::new(&DATA, 4);
        assert_eq!(res.byte_len(), 8);
        assert_eq!(res.entry(0), Some(Rgb444::from_raw(0x0100)));
        assert_eq!(res.entry(3), Some(Rgb444::from_raw(0x0706)));
        assert_eq!(res.entry(4), None);

        let odd = PaletteResource::from_bytes(&DATA[..7]);
        assert_eq!(odd.size(), 3);
    }
}
