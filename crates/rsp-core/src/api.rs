//! Host-facing configuration and collaborator contracts.
//!
//! The coprocessor owns none of the machine around it. Interrupt lines, the
//! event timeline, the raster stage, main memory and the microcode executor are
//! all reached through the traits below, bundled into a single [`RspHost`]
//! handed to [`crate::Rsp::new`].

use crate::{SpState, DP_INTERRUPT_DELAY, SP_COMPLETION_DELAY, TASK_CYCLE_BUDGET};

/// Top-level immutable configuration for a coprocessor instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RspConfig {
    /// Setting `SIG0` also signals the SP interrupt (audio-ready shortcut).
    pub audio_signal: bool,
    /// Audio tasks go to the HLE audio executor instead of the primary one.
    pub hle_audio_lists: bool,
    /// Graphics tasks run even while the raster stage reports itself frozen.
    pub skip_raster_freeze_check: bool,
    /// Delay before the completion interrupt of an unhalted task fires.
    pub completion_interrupt_delay: u32,
    /// Delay before the display interrupt raised by a graphics task fires.
    pub display_interrupt_delay: u32,
    /// Cycle budget passed to the executor for each task run.
    pub max_task_cycles: u32,
}

impl Default for RspConfig {
    fn default() -> Self {
        Self {
            audio_signal: false,
            hle_audio_lists: false,
            skip_raster_freeze_check: false,
            completion_interrupt_delay: SP_COMPLETION_DELAY,
            display_interrupt_delay: DP_INTERRUPT_DELAY,
            max_task_cycles: TASK_CYCLE_BUDGET,
        }
    }
}

/// Interrupt sources this core drives on the shared interrupt controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum InterruptSource {
    /// Signal-processor interrupt.
    Sp,
    /// Display-processor interrupt.
    Dp,
}

/// Timeline events this core schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum EventKind {
    /// Deferred task-completion interrupt; delivered via
    /// [`crate::Rsp::on_completion_event`].
    SpInterrupt,
    /// Deferred display interrupt after a graphics task.
    DpInterrupt,
}

/// Task classification read from the type tag in local memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TaskKind {
    /// Display list (tag `1`).
    Graphics,
    /// Audio list (tag `2`).
    Audio,
    /// Any other tag; executed best-effort on the primary executor.
    Other(u32),
}

impl TaskKind {
    /// Classifies a raw task type tag.
    #[must_use]
    pub const fn from_tag(tag: u32) -> Self {
        match tag {
            1 => Self::Graphics,
            2 => Self::Audio,
            other => Self::Other(other),
        }
    }
}

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// The executor ran the task.
    Ran {
        /// Task classification.
        kind: TaskKind,
        /// Cycles reported by the executor.
        cycles: u32,
        /// A completion interrupt was scheduled because the task did not halt.
        completion_scheduled: bool,
    },
    /// A graphics task was parked until the raster stage unfreezes.
    Deferred,
}

/// Interrupt controller lines used by the coprocessor.
pub trait InterruptController {
    /// Raises `source` immediately.
    fn raise_interrupt(&mut self, source: InterruptSource);

    /// Clears a pending `source` interrupt.
    fn clear_interrupt(&mut self, source: InterruptSource);

    /// Marks `source` pending; the controller decides when the CPU observes it.
    fn signal_interrupt(&mut self, source: InterruptSource);
}

/// Shared, globally ordered event timeline owned by the CPU core.
pub trait EventTimeline {
    /// Schedules `kind` to fire `delay` ticks from now.
    fn schedule_event(&mut self, kind: EventKind, delay: u32);

    /// Returns `true` while an event of `kind` is scheduled and has not fired.
    fn is_event_pending(&self, kind: EventKind) -> bool;
}

/// Downstream raster stage as seen by the task dispatcher.
///
/// When the stage leaves the frozen state it must call
/// [`crate::Rsp::notify_raster_unfrozen`] once, or a deferred graphics task is
/// never run.
pub trait RasterStage {
    /// Returns `true` while graphics tasks must not run.
    fn is_frozen(&self) -> bool;

    /// Re-enables framebuffer write protection.
    fn protect_framebuffers(&mut self);

    /// Lifts framebuffer write protection for the duration of a graphics task.
    fn unprotect_framebuffers(&mut self);

    /// Returns and clears the raster stage's pending interrupt flag.
    fn consume_interrupt_flag(&mut self) -> bool;

    /// Notifies the frontend that a graphics task produced a frame.
    fn new_frame(&mut self) {}
}

/// Byte-order-safe main-memory accessor.
///
/// Addresses are coprocessor (big-endian) byte addresses already reduced
/// modulo [`RdramBus::size`]; implementations apply their own byte-order
/// correction.
pub trait RdramBus {
    /// Size in bytes of main memory. Must be non-zero.
    fn size(&self) -> u32;

    /// Reads one byte.
    fn read_byte(&self, address: u32) -> u8;

    /// Writes one byte.
    fn write_byte(&mut self, address: u32, value: u8);
}

/// Opaque microcode executor.
pub trait TaskExecutor {
    /// Runs the loaded task until it yields or `max_cycles` elapse.
    ///
    /// Returns the number of cycles consumed.
    fn run_until_yield(&mut self, sp: &mut SpState, max_cycles: u32) -> u32;

    /// Alternate high-level audio executor used when
    /// [`RspConfig::hle_audio_lists`] is set.
    fn run_audio_hle(&mut self, sp: &mut SpState, max_cycles: u32) -> u32 {
        self.run_until_yield(sp, max_cycles)
    }
}

/// Everything the coprocessor needs from the surrounding machine.
pub trait RspHost: InterruptController + EventTimeline + RasterStage + RdramBus + TaskExecutor {}

impl<T> RspHost for T where
    T: InterruptController + EventTimeline + RasterStage + RdramBus + TaskExecutor
{
}
