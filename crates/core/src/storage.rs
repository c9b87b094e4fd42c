//! Register transfer primitive and the register banks it writes to.
//!
//! Everything above this module (palette loads, resource uploads) reduces to
//! a single [`RegisterTransfer::copy_to_register`] call. The trait is the
//! seam between the loaders and whatever actually moves bytes: real
//! hardware, the in-memory [`RegisterBank`], or a [`RecordingTransfer`].

use crate::logging::{log, LogCategory, LogLevel};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default size of the palette register bank in bytes (256 two-byte entries).
pub const PALETTE_BANK_BYTES: usize = 512;

/// Register banks addressable by a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RegisterTarget {
    /// Color lookup table consumed by the graphics subsystem
    Palette,
}

/// Memory-to-register copy primitive.
///
/// Transfers are synchronous: when `copy_to_register` returns the bytes are
/// in the register bank. Implementations decide what happens when
/// `offset + source.len()` runs past the end of the target; callers that
/// need a guarantee check against [`RegisterTransfer::capacity`] first.
pub trait RegisterTransfer {
    /// Copy `source` into `target` starting at byte `offset`.
    /// The byte count of the transfer is `source.len()`.
    fn copy_to_register(&mut self, target: RegisterTarget, offset: u8, source: &[u8]);

    /// Number of addressable bytes in `target`.
    fn capacity(&self, target: RegisterTarget) -> usize;
}

impl<T: RegisterTransfer + ?Sized> RegisterTransfer for &mut T {
    fn copy_to_register(&mut self, target: RegisterTarget, offset: u8, source: &[u8]) {
        (**self).copy_to_register(target, offset, source)
    }

    fn capacity(&self, target: RegisterTarget) -> usize {
        (**self).capacity(target)
    }
}

/// In-memory register storage.
///
/// Writes that run past the end of a bank are truncated at the bank
/// boundary, matching how the hardware drops writes to unmapped registers.
#[derive(Debug, Clone)]
pub struct RegisterBank {
    palette: Vec<u8>,
}

impl RegisterBank {
    /// Create a bank with the default palette size.
    pub fn new() -> Self {
        Self::with_palette_size(PALETTE_BANK_BYTES)
    }

    /// Create a bank with a palette of `bytes` bytes, all zero.
    pub fn with_palette_size(bytes: usize) -> Self {
        Self {
            palette: vec![0; bytes],
        }
    }

    /// Raw palette register contents.
    pub fn palette(&self) -> &[u8] {
        &self.palette
    }

    /// Little-endian palette entry at `index`, or `None` past the end.
    pub fn palette_entry(&self, index: usize) -> Option<u16> {
        let start = index.checked_mul(2)?;
        let bytes = self.palette.get(start..start.checked_add(2)?)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Clear every register to zero.
    pub fn reset(&mut self) {
        self.palette.fill(0);
    }

    /// JSON view of the bank for debugging dumps.
    pub fn snapshot(&self) -> Value {
        let entries: Vec<u16> = (0..self.palette.len() / 2)
            .filter_map(|i| self.palette_entry(i))
            .collect();
        json!({
            "palette_bytes": self.palette.len(),
            "palette": entries,
        })
    }

    fn bank_mut(&mut self, target: RegisterTarget) -> &mut [u8] {
        match target {
            RegisterTarget::Palette => &mut self.palette,
        }
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterTransfer for RegisterBank {
    fn copy_to_register(&mut self, target: RegisterTarget, offset: u8, source: &[u8]) {
        let bank = self.bank_mut(target);
        let bank_len = bank.len();
        let start = (offset as usize).min(bank_len);
        let len = source.len().min(bank_len - start);

        bank[start..start + len].copy_from_slice(&source[..len]);

        log(LogCategory::Transfer, LogLevel::Trace, || {
            format!(
                "Transfer: {:?} offset={:02X} bytes={}",
                target,
                offset,
                source.len()
            )
        });
        if len < source.len() {
            log(LogCategory::Transfer, LogLevel::Warn, || {
                format!(
                    "Transfer: {:?} write of {} bytes at {:02X} truncated to {} (bank is {} bytes)",
                    target,
                    source.len(),
                    offset,
                    len,
                    bank_len
                )
            });
        }
    }

    fn capacity(&self, target: RegisterTarget) -> usize {
        match target {
            RegisterTarget::Palette => self.palette.len(),
        }
    }
}

/// One register write as issued by a loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub target: RegisterTarget,
    pub offset: u8,
    pub bytes: Vec<u8>,
}

impl TransferRequest {
    /// Byte count of the request.
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }
}

/// Transfer that records requests instead of performing them.
///
/// Used for dry runs and for asserting exactly which writes a loader issued.
#[derive(Debug, Clone)]
pub struct RecordingTransfer {
    requests: Vec<TransferRequest>,
    palette_capacity: usize,
}

impl RecordingTransfer {
    pub fn new() -> Self {
        Self::with_palette_capacity(PALETTE_BANK_BYTES)
    }

    /// Report `bytes` as the palette capacity to checked loads.
    pub fn with_palette_capacity(bytes: usize) -> Self {
        Self {
            requests: Vec::new(),
            palette_capacity: bytes,
        }
    }

    pub fn requests(&self) -> &[TransferRequest] {
        &self.requests
    }

    pub fn take_requests(&mut self) -> Vec<TransferRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl Default for RecordingTransfer {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterTransfer for RecordingTransfer {
    fn copy_to_register(&mut self, target: RegisterTarget, offset: u8, source: &[u8]) {
        self.requests.push(TransferRequest {
            target,
            offset,
            bytes: source.to_vec(),
        });
    }

    fn capacity(&self, target: RegisterTarget) -> usize {
        match target {
            RegisterTarget::Palette => self.palette_capacity,
        }
    }
}
