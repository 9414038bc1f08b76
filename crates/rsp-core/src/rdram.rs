//! Host-order main memory with byte-swapped byte access.
//!
//! Main memory is kept as host little-endian 32-bit words, so a big-endian
//! byte address has to be corrected with [`BYTE_ADDR_XOR`] before it indexes
//! the raw byte buffer. Out-of-range accesses wrap.

use crate::{RdramBus, BYTE_ADDR_XOR};

/// Default main-memory size (4 MiB, no expansion pak).
pub const RDRAM_DEFAULT_SIZE: u32 = 0x0040_0000;

/// Word-organised main memory implementing [`RdramBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rdram {
    bytes: Box<[u8]>,
}

impl Default for Rdram {
    fn default() -> Self {
        Self::new(RDRAM_DEFAULT_SIZE)
    }
}

impl Rdram {
    /// Allocates zeroed main memory of `size` bytes, rounded up to whole words.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let words = size.max(4).div_ceil(4) as usize;
        Self {
            bytes: vec![0; words * 4].into_boxed_slice(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn wrap(&self, address: u32) -> usize {
        (address % self.bytes.len() as u32) as usize
    }

    /// Reads the aligned big-endian word containing `address`.
    #[must_use]
    pub fn read_word(&self, address: u32) -> u32 {
        let base = self.wrap(address) & !3;
        let mut raw = [0; 4];
        raw.copy_from_slice(&self.bytes[base..base + 4]);
        u32::from_le_bytes(raw)
    }

    /// Writes the aligned big-endian word containing `address`.
    pub fn write_word(&mut self, address: u32, value: u32) {
        let base = self.wrap(address) & !3;
        self.bytes[base..base + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl RdramBus for Rdram {
    #[allow(clippy::cast_possible_truncation)]
    fn size(&self) -> u32 {
        self.bytes.len() as u32
    }

    fn read_byte(&self, address: u32) -> u8 {
        self.bytes[self.wrap(address ^ BYTE_ADDR_XOR)]
    }

    fn write_byte(&mut self, address: u32, value: u8) {
        let index = self.wrap(address ^ BYTE_ADDR_XOR);
        self.bytes[index] = value;
    }
}
