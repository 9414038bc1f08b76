//! Saturating activity counters for the coprocessor.

use crate::{DmaDirection, TaskKind};

/// Counters describing work handed to the coprocessor since power-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RspDiagnostics {
    /// Graphics tasks run.
    pub graphics_tasks: u32,
    /// Audio tasks run.
    pub audio_tasks: u32,
    /// Tasks with any other type tag run.
    pub other_tasks: u32,
    /// Graphics tasks parked because the raster stage was frozen.
    pub deferred_tasks: u32,
    /// Completion interrupts scheduled.
    pub completions_scheduled: u32,
    /// Completion interrupts that reached the interrupt controller.
    pub completions_raised: u32,
    /// Transfers from main memory into local memory.
    pub dma_reads: u32,
    /// Transfers from local memory into main memory.
    pub dma_writes: u32,
    /// Bytes moved into local memory.
    pub dma_read_bytes: u64,
    /// Bytes moved into main memory.
    pub dma_write_bytes: u64,
}

impl RspDiagnostics {
    /// Records a completed task run.
    pub const fn record_task(&mut self, kind: TaskKind) {
        let counter = match kind {
            TaskKind::Graphics => &mut self.graphics_tasks,
            TaskKind::Audio => &mut self.audio_tasks,
            TaskKind::Other(_) => &mut self.other_tasks,
        };
        *counter = counter.saturating_add(1);
    }

    /// Records a graphics task deferred on a frozen raster stage.
    pub const fn record_deferred(&mut self) {
        self.deferred_tasks = self.deferred_tasks.saturating_add(1);
    }

    /// Records a scheduled completion interrupt.
    pub const fn record_completion_scheduled(&mut self) {
        self.completions_scheduled = self.completions_scheduled.saturating_add(1);
    }

    /// Records a completion interrupt delivered to the interrupt controller.
    pub const fn record_completion_raised(&mut self) {
        self.completions_raised = self.completions_raised.saturating_add(1);
    }

    /// Records a finished DMA transfer of `bytes` bytes.
    pub const fn record_dma(&mut self, direction: DmaDirection, bytes: u32) {
        match direction {
            DmaDirection::ToLocal => {
                self.dma_reads = self.dma_reads.saturating_add(1);
                self.dma_read_bytes = self.dma_read_bytes.saturating_add(bytes as u64);
            }
            DmaDirection::ToMain => {
                self.dma_writes = self.dma_writes.saturating_add(1);
                self.dma_write_bytes = self.dma_write_bytes.saturating_add(bytes as u64);
            }
        }
    }

    /// Total tasks run across all kinds.
    #[must_use]
    pub const fn tasks_run(&self) -> u32 {
        self.graphics_tasks
            .saturating_add(self.audio_tasks)
            .saturating_add(self.other_tasks)
    }

    /// Resets all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
