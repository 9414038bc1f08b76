use crate::{ControlRegister, PcRegister, CONTROL_REGISTER_COUNT, PC_REGISTER_COUNT};

/// `SP_STATUS` bit: coprocessor halted.
pub const SP_STATUS_HALT: u32 = 1 << 0;
/// `SP_STATUS` bit: coprocessor executed a break.
pub const SP_STATUS_BROKE: u32 = 1 << 1;
/// `SP_STATUS` bit: DMA busy.
pub const SP_STATUS_DMA_BUSY: u32 = 1 << 2;
/// `SP_STATUS` bit: DMA full.
pub const SP_STATUS_DMA_FULL: u32 = 1 << 3;
/// `SP_STATUS` bit: IO full.
pub const SP_STATUS_IO_FULL: u32 = 1 << 4;
/// `SP_STATUS` bit: single-step mode.
pub const SP_STATUS_SSTEP: u32 = 1 << 5;
/// `SP_STATUS` bit: raise the SP interrupt when a task breaks.
pub const SP_STATUS_INTR_BREAK: u32 = 1 << 6;
/// `SP_STATUS` bit: signal 0, doubles as the audio-ready signal.
pub const SP_STATUS_SIG0: u32 = 1 << 7;
/// `SP_STATUS` bit: signal 1.
pub const SP_STATUS_SIG1: u32 = 1 << 8;
/// `SP_STATUS` bit: signal 2.
pub const SP_STATUS_SIG2: u32 = 1 << 9;
/// `SP_STATUS` bit: signal 3.
pub const SP_STATUS_SIG3: u32 = 1 << 10;
/// `SP_STATUS` bit: signal 4.
pub const SP_STATUS_SIG4: u32 = 1 << 11;
/// `SP_STATUS` bit: signal 5.
pub const SP_STATUS_SIG5: u32 = 1 << 12;
/// `SP_STATUS` bit: signal 6.
pub const SP_STATUS_SIG6: u32 = 1 << 13;
/// `SP_STATUS` bit: signal 7.
pub const SP_STATUS_SIG7: u32 = 1 << 14;
/// Status bits that keep a task from being dispatched.
pub const SP_STATUS_STOPPED_MASK: u32 = SP_STATUS_HALT | SP_STATUS_BROKE;

/// Mask selecting the local-memory offset part of `SP_PC`.
pub const SP_PC_OFFSET_MASK: u32 = 0xFFF;

/// Control and secondary register banks of the coprocessor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SpRegisters {
    regs: [u32; CONTROL_REGISTER_COUNT],
    regs2: [u32; PC_REGISTER_COUNT],
}

impl SpRegisters {
    /// Builds banks from raw register arrays.
    #[must_use]
    pub const fn from_raw(
        regs: [u32; CONTROL_REGISTER_COUNT],
        regs2: [u32; PC_REGISTER_COUNT],
    ) -> Self {
        Self { regs, regs2 }
    }

    /// Returns the raw control bank.
    #[must_use]
    pub const fn control_bank(&self) -> [u32; CONTROL_REGISTER_COUNT] {
        self.regs
    }

    /// Returns the raw secondary bank.
    #[must_use]
    pub const fn pc_bank(&self) -> [u32; PC_REGISTER_COUNT] {
        self.regs2
    }

    /// Reads a control-bank register without side effects.
    #[must_use]
    pub const fn get(&self, reg: ControlRegister) -> u32 {
        self.regs[reg.index()]
    }

    /// Stores a control-bank register without side effects.
    pub const fn set(&mut self, reg: ControlRegister, value: u32) {
        self.regs[reg.index()] = value;
    }

    /// Reads a secondary-bank register.
    #[must_use]
    pub const fn get_pc_bank(&self, reg: PcRegister) -> u32 {
        self.regs2[reg.index()]
    }

    /// Stores a secondary-bank register.
    pub const fn set_pc_bank(&mut self, reg: PcRegister, value: u32) {
        self.regs2[reg.index()] = value;
    }

    /// Reads `SP_STATUS`.
    #[must_use]
    pub const fn status(&self) -> u32 {
        self.get(ControlRegister::Status)
    }

    /// Writes `SP_STATUS`.
    pub const fn set_status(&mut self, value: u32) {
        self.set(ControlRegister::Status, value);
    }

    /// Returns `true` when every bit of `bits` is set in `SP_STATUS`.
    #[must_use]
    pub const fn status_has(&self, bits: u32) -> bool {
        self.status() & bits == bits
    }

    /// Returns `true` when the coprocessor is halted or broken.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.status() & SP_STATUS_STOPPED_MASK != 0
    }

    /// Reads `SP_PC`.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.get_pc_bank(PcRegister::Pc)
    }

    /// Writes `SP_PC`.
    pub const fn set_pc(&mut self, value: u32) {
        self.set_pc_bank(PcRegister::Pc, value);
    }

    /// Zeroes both banks and leaves the coprocessor halted.
    pub const fn power_on(&mut self) {
        self.regs = [0; CONTROL_REGISTER_COUNT];
        self.regs2 = [0; PC_REGISTER_COUNT];
        self.regs[ControlRegister::Status.index()] = SP_STATUS_HALT;
    }
}
