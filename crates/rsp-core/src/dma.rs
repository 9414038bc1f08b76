//! Strided block transfers between local memory and main memory.
//!
//! Every byte crosses through [`RdramBus`] individually so the main-memory
//! side applies its byte-order correction at each position, never per word.

use log::trace;

use crate::{RdramBus, SpMemory, SP_MEM_HALF_SIZE};

/// Bits of `SP_MEM_ADDR` giving the offset inside a local-memory half.
pub const SP_MEM_OFFSET_MASK: u32 = SP_MEM_HALF_SIZE - 1;
/// Bit of `SP_MEM_ADDR` selecting the local-memory half.
pub const SP_MEM_HALF_SELECT: u32 = SP_MEM_HALF_SIZE;
/// Bits of `SP_DRAM_ADDR` that address main memory.
pub const DRAM_ADDR_MASK: u32 = 0x00FF_FFFF;

/// Transfer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DmaDirection {
    /// Main memory into local memory, started by writing `SP_RD_LEN`.
    ToLocal,
    /// Local memory into main memory, started by writing `SP_WR_LEN`.
    ToMain,
}

/// Decoded length-register fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DmaRequest {
    /// Transfer direction.
    pub direction: DmaDirection,
    /// Bytes per row.
    pub length: u32,
    /// Number of rows.
    pub count: u32,
    /// Extra main-memory stride added after each row.
    pub skip: u32,
}

impl DmaRequest {
    /// Decodes a length register value for `direction`.
    ///
    /// Reads from main memory round the row length up to a multiple of eight
    /// bytes; writes use it as given.
    #[must_use]
    pub const fn decode(direction: DmaDirection, len_reg: u32) -> Self {
        let raw_length = len_reg & 0xFFF;
        let length = match direction {
            DmaDirection::ToLocal => (raw_length | 7) + 1,
            DmaDirection::ToMain => raw_length + 1,
        };
        Self {
            direction,
            length,
            count: ((len_reg >> 12) & 0xFF) + 1,
            skip: (len_reg >> 20) & 0xFFF,
        }
    }

    /// Total bytes moved by this request.
    #[must_use]
    pub const fn total_bytes(&self) -> u32 {
        self.length * self.count
    }
}

/// Executes `request` using the `SP_MEM_ADDR`/`SP_DRAM_ADDR` register values.
///
/// Local addresses wrap inside the half selected by `mem_addr`; main-memory
/// addresses wrap modulo `rdram.size()`. Returns the number of bytes moved.
pub fn run_dma<R>(
    mem: &mut SpMemory,
    rdram: &mut R,
    mem_addr: u32,
    dram_addr: u32,
    request: DmaRequest,
) -> u32
where
    R: RdramBus + ?Sized,
{
    let half = mem_addr & SP_MEM_HALF_SELECT;
    let mut offset = mem_addr & SP_MEM_OFFSET_MASK;
    let mut dram = dram_addr & DRAM_ADDR_MASK;
    let dram_size = rdram.size().max(1);

    trace!(
        "sp dma {:?}: mem={:#06x} dram={:#08x} length={} count={} skip={}",
        request.direction,
        half | offset,
        dram,
        request.length,
        request.count,
        request.skip
    );

    for _ in 0..request.count {
        for _ in 0..request.length {
            let local = half | (offset & SP_MEM_OFFSET_MASK);
            let main = dram % dram_size;
            match request.direction {
                DmaDirection::ToLocal => mem.write_byte(local, rdram.read_byte(main)),
                DmaDirection::ToMain => rdram.write_byte(main, mem.read_byte(local)),
            }
            offset = offset.wrapping_add(1);
            dram = dram.wrapping_add(1);
        }
        dram = dram.wrapping_add(request.skip);
    }

    request.total_bytes()
}
