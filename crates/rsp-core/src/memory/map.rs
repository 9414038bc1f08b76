//! Fixed register-bank layout and address decoding helpers.

/// Byte offset of `SP_MEM_ADDR` in the control bank.
pub const SP_MEM_ADDR_OFFSET: u32 = 0x00;
/// Byte offset of `SP_DRAM_ADDR` in the control bank.
pub const SP_DRAM_ADDR_OFFSET: u32 = 0x04;
/// Byte offset of `SP_RD_LEN` in the control bank.
pub const SP_RD_LEN_OFFSET: u32 = 0x08;
/// Byte offset of `SP_WR_LEN` in the control bank.
pub const SP_WR_LEN_OFFSET: u32 = 0x0C;
/// Byte offset of `SP_STATUS` in the control bank.
pub const SP_STATUS_OFFSET: u32 = 0x10;
/// Byte offset of `SP_DMA_FULL` in the control bank.
pub const SP_DMA_FULL_OFFSET: u32 = 0x14;
/// Byte offset of `SP_DMA_BUSY` in the control bank.
pub const SP_DMA_BUSY_OFFSET: u32 = 0x18;
/// Byte offset of `SP_SEMAPHORE` in the control bank.
pub const SP_SEMAPHORE_OFFSET: u32 = 0x1C;

/// Byte offset of `SP_PC` in the secondary bank.
pub const SP_PC_OFFSET: u32 = 0x00;
/// Byte offset of `SP_IBIST` in the secondary bank.
pub const SP_IBIST_OFFSET: u32 = 0x04;

/// Number of 32-bit registers in the control bank.
pub const CONTROL_REGISTER_COUNT: usize = 8;
/// Number of 32-bit registers in the secondary bank.
pub const PC_REGISTER_COUNT: usize = 2;

/// Control-bank register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum ControlRegister {
    /// Local-memory DMA address (`0x00`).
    MemAddr = 0,
    /// Main-memory DMA address (`0x04`).
    DramAddr = 1,
    /// DMA length register, main memory into local memory (`0x08`).
    RdLen = 2,
    /// DMA length register, local memory into main memory (`0x0C`).
    WrLen = 3,
    /// Status register with set/clear write semantics (`0x10`).
    Status = 4,
    /// Read-only DMA full flag (`0x14`).
    DmaFull = 5,
    /// Read-only DMA busy flag (`0x18`).
    DmaBusy = 6,
    /// Acquire-on-read, release-on-write semaphore (`0x1C`).
    Semaphore = 7,
}

impl ControlRegister {
    /// Ordered list of all control-bank registers.
    pub const ALL: [Self; CONTROL_REGISTER_COUNT] = [
        Self::MemAddr,
        Self::DramAddr,
        Self::RdLen,
        Self::WrLen,
        Self::Status,
        Self::DmaFull,
        Self::DmaBusy,
        Self::Semaphore,
    ];

    /// Returns the array index for this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the byte offset of this register within the control bank.
    #[must_use]
    pub const fn offset(self) -> u32 {
        (self as u32) << 2
    }

    /// Returns `true` for registers whose writes are ignored.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::DmaFull | Self::DmaBusy)
    }
}

/// Secondary-bank register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum PcRegister {
    /// Task program counter (`0x00`).
    Pc = 0,
    /// Built-in self test register (`0x04`).
    Ibist = 1,
}

impl PcRegister {
    /// Returns the array index for this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

const _: () = assert_control_layout();

const fn assert_control_layout() {
    assert!(ControlRegister::MemAddr.offset() == SP_MEM_ADDR_OFFSET);
    assert!(ControlRegister::DramAddr.offset() == SP_DRAM_ADDR_OFFSET);
    assert!(ControlRegister::RdLen.offset() == SP_RD_LEN_OFFSET);
    assert!(ControlRegister::WrLen.offset() == SP_WR_LEN_OFFSET);
    assert!(ControlRegister::Status.offset() == SP_STATUS_OFFSET);
    assert!(ControlRegister::DmaFull.offset() == SP_DMA_FULL_OFFSET);
    assert!(ControlRegister::DmaBusy.offset() == SP_DMA_BUSY_OFFSET);
    assert!(ControlRegister::Semaphore.offset() == SP_SEMAPHORE_OFFSET);
    assert!(
        CONTROL_REGISTER_COUNT.is_power_of_two() && PC_REGISTER_COUNT.is_power_of_two(),
        "bank sizes must allow index masking"
    );
}

/// Decodes a bus address into its control-bank register.
///
/// Only the word index matters; higher address bits wrap within the bank.
#[must_use]
pub const fn decode_control_register(address: u32) -> ControlRegister {
    ControlRegister::ALL[(address as usize >> 2) & (CONTROL_REGISTER_COUNT - 1)]
}

/// Decodes a bus address into its secondary-bank register.
#[must_use]
pub const fn decode_pc_register(address: u32) -> PcRegister {
    match (address >> 2) as usize & (PC_REGISTER_COUNT - 1) {
        0 => PcRegister::Pc,
        _ => PcRegister::Ibist,
    }
}
