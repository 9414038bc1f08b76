//! Control-register, DMA and task-dispatch core for an RSP-style coprocessor.

/// Local memory and register-bank address map.
pub mod memory;
pub use memory::{
    decode_control_register, decode_pc_register, masked_write, read_byte_lane,
    sp_mem_word_index, write_byte_lane, ControlRegister, PcRegister, SpMemory, BYTE_ADDR_XOR,
    CONTROL_REGISTER_COUNT, DMEM_START, IMEM_START, PC_REGISTER_COUNT, SP_DMA_BUSY_OFFSET,
    SP_DMA_FULL_OFFSET, SP_DRAM_ADDR_OFFSET, SP_IBIST_OFFSET, SP_MEM_ADDR_OFFSET,
    SP_MEM_HALF_SIZE, SP_MEM_SIZE, SP_MEM_WORDS, SP_PC_OFFSET, SP_RD_LEN_OFFSET,
    SP_SEMAPHORE_OFFSET, SP_STATUS_OFFSET, SP_WR_LEN_OFFSET,
};

/// Host-facing configuration and collaborator traits.
pub mod api;
pub use api::{
    DispatchOutcome, EventKind, EventTimeline, InterruptController, InterruptSource,
    RasterStage, RdramBus, RspConfig, RspHost, TaskExecutor, TaskKind,
};

/// Register banks, coprocessor state and the dispatch guard.
pub mod state;
pub use state::{
    SpRegisters, SpState, TaskState, SP_PC_OFFSET_MASK, SP_STATUS_BROKE, SP_STATUS_DMA_BUSY,
    SP_STATUS_DMA_FULL, SP_STATUS_HALT, SP_STATUS_INTR_BREAK, SP_STATUS_IO_FULL,
    SP_STATUS_SIG0, SP_STATUS_SIG1, SP_STATUS_SIG2, SP_STATUS_SIG3, SP_STATUS_SIG4,
    SP_STATUS_SIG5, SP_STATUS_SIG6, SP_STATUS_SIG7, SP_STATUS_SSTEP, SP_STATUS_STOPPED_MASK,
};

/// `SP_STATUS` write decode table.
pub mod status;
pub use status::{
    decode_status_write, sp_clr_sig, sp_set_sig, StatusCommand, StatusSideEffect, StatusUpdate,
    SP_CLR_BROKE, SP_CLR_HALT, SP_CLR_INTR, SP_CLR_INTR_BREAK, SP_CLR_SSTEP, SP_SET_HALT,
    SP_SET_INTR, SP_SET_INTR_BREAK, SP_SET_SSTEP, STATUS_WRITE_TABLE,
};

/// DMA engine between local and main memory.
pub mod dma;
pub use dma::{run_dma, DmaDirection, DmaRequest, DRAM_ADDR_MASK};

/// Reference main-memory implementation.
pub mod rdram;
pub use rdram::{Rdram, RDRAM_DEFAULT_SIZE};

/// Fixed scheduling delays.
pub mod timing;
pub use timing::{
    default_event_delay, DP_INTERRUPT_DELAY, EVENT_DELAY_TABLE, SP_COMPLETION_DELAY,
    TASK_CYCLE_BUDGET,
};

/// Activity counters.
pub mod diag;
pub use diag::RspDiagnostics;

/// Save-state format and restore errors.
pub mod snapshot;
pub use snapshot::{RspSnapshot, SnapshotError, SnapshotVersion};

/// The coprocessor and its task dispatcher.
pub mod rsp;
pub use rsp::{Rsp, TASK_TYPE_OFFSET};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
