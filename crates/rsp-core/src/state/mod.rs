//! Coprocessor register banks, local memory and dispatch-guard state.

/// Control and secondary register banks.
pub mod registers;
/// Dispatch guard state machine.
pub mod task_state;

pub use registers::{
    SpRegisters, SP_PC_OFFSET_MASK, SP_STATUS_BROKE, SP_STATUS_DMA_BUSY, SP_STATUS_DMA_FULL,
    SP_STATUS_HALT, SP_STATUS_INTR_BREAK, SP_STATUS_IO_FULL, SP_STATUS_SIG0, SP_STATUS_SIG1,
    SP_STATUS_SIG2, SP_STATUS_SIG3, SP_STATUS_SIG4, SP_STATUS_SIG5, SP_STATUS_SIG6,
    SP_STATUS_SIG7, SP_STATUS_SSTEP, SP_STATUS_STOPPED_MASK,
};
pub use task_state::TaskState;

use crate::SpMemory;

/// Coprocessor state visible to the task executor.
///
/// The executor gets mutable access for the duration of a task run so that
/// microcode can halt the coprocessor or touch local memory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SpState {
    /// Local memory (DMEM + IMEM).
    pub mem: SpMemory,
    /// Control and secondary register banks.
    pub regs: SpRegisters,
}

impl SpState {
    /// Applies power-on semantics: memory and banks zeroed, `SP_STATUS` halted.
    pub fn power_on(&mut self) {
        self.mem.clear();
        self.regs.power_on();
    }
}
