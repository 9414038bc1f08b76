//! Coprocessor local memory and register-bank address map.

/// Masked-write and byte-lane helpers.
pub mod access;
/// Register-bank layout and address decoder.
pub mod map;

pub use access::{masked_write, read_byte_lane, write_byte_lane, BYTE_ADDR_XOR};
pub use map::{
    decode_control_register, decode_pc_register, ControlRegister, PcRegister,
    CONTROL_REGISTER_COUNT, PC_REGISTER_COUNT, SP_DMA_BUSY_OFFSET, SP_DMA_FULL_OFFSET,
    SP_DRAM_ADDR_OFFSET, SP_IBIST_OFFSET, SP_MEM_ADDR_OFFSET, SP_PC_OFFSET, SP_RD_LEN_OFFSET,
    SP_SEMAPHORE_OFFSET, SP_STATUS_OFFSET, SP_WR_LEN_OFFSET,
};

/// Size in bytes of coprocessor local memory (DMEM followed by IMEM).
pub const SP_MEM_SIZE: usize = 0x2000;
/// Size in bytes of one local-memory half.
pub const SP_MEM_HALF_SIZE: u32 = 0x1000;
/// Number of 32-bit words backing local memory.
pub const SP_MEM_WORDS: usize = SP_MEM_SIZE / 4;
/// Byte offset of the data half (DMEM).
pub const DMEM_START: u32 = 0x0000;
/// Byte offset of the instruction half (IMEM).
pub const IMEM_START: u32 = 0x1000;

/// Converts a bus address into a local-memory word index.
#[must_use]
pub const fn sp_mem_word_index(address: u32) -> usize {
    ((address as usize) & (SP_MEM_SIZE - 1)) >> 2
}

/// Coprocessor local memory, stored as big-endian 32-bit words.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SpMemory {
    words: Box<[u32]>,
}

impl Default for SpMemory {
    fn default() -> Self {
        Self {
            words: vec![0; SP_MEM_WORDS].into_boxed_slice(),
        }
    }
}

impl SpMemory {
    /// Allocates a zeroed local memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes the whole buffer.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Reads the word containing bus address `address`.
    #[must_use]
    pub fn read_word(&self, address: u32) -> u32 {
        self.words[sp_mem_word_index(address)]
    }

    /// Applies a masked write to the word containing `address`.
    pub fn write_word(&mut self, address: u32, value: u32, mask: u32) {
        let slot = &mut self.words[sp_mem_word_index(address)];
        *slot = masked_write(*slot, value, mask);
    }

    /// Reads one byte in coprocessor (big-endian) byte order.
    #[must_use]
    pub fn read_byte(&self, address: u32) -> u8 {
        read_byte_lane(self.read_word(address), address)
    }

    /// Writes one byte in coprocessor (big-endian) byte order.
    pub fn write_byte(&mut self, address: u32, value: u8) {
        let slot = &mut self.words[sp_mem_word_index(address)];
        *slot = write_byte_lane(*slot, address, value);
    }

    /// Returns the backing words in address order.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Replaces the backing words.
    ///
    /// Returns `false` and leaves memory untouched when `words` has the wrong
    /// length.
    pub fn load_words(&mut self, words: &[u32]) -> bool {
        if words.len() != SP_MEM_WORDS {
            return false;
        }
        self.words.copy_from_slice(words);
        true
    }
}
