use crate::EventKind;

/// Ticks between a task returning from the executor and its completion
/// interrupt being observable by the CPU.
pub const SP_COMPLETION_DELAY: u32 = 1000;

/// Ticks between a graphics task finishing and the display interrupt firing.
pub const DP_INTERRUPT_DELAY: u32 = 4000;

/// Cycle budget handed to the executor for one task run.
pub const TASK_CYCLE_BUDGET: u32 = u32::MAX;

/// Default scheduling delay for every event kind this core schedules.
pub const EVENT_DELAY_TABLE: &[(EventKind, u32)] = &[
    (EventKind::SpInterrupt, SP_COMPLETION_DELAY),
    (EventKind::DpInterrupt, DP_INTERRUPT_DELAY),
];

/// Looks up the default scheduling delay for an event kind.
#[must_use]
pub fn default_event_delay(kind: EventKind) -> Option<u32> {
    EVENT_DELAY_TABLE
        .iter()
        .find_map(|(entry_kind, delay)| (*entry_kind == kind).then_some(*delay))
}
