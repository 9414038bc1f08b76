//! `SP_STATUS` write decoding.
//!
//! A write to `SP_STATUS` never stores the written value. Each bit is a command
//! from [`STATUS_WRITE_TABLE`]; commands are applied in deterministic passes:
//! all clears, then all sets, then the interrupt side effects in table order.

use crate::{
    SP_STATUS_BROKE, SP_STATUS_HALT, SP_STATUS_INTR_BREAK, SP_STATUS_SIG0, SP_STATUS_SIG1,
    SP_STATUS_SIG2, SP_STATUS_SIG3, SP_STATUS_SIG4, SP_STATUS_SIG5, SP_STATUS_SIG6,
    SP_STATUS_SIG7, SP_STATUS_SSTEP,
};

/// Write bit: clear `HALT`.
pub const SP_CLR_HALT: u32 = 1 << 0;
/// Write bit: set `HALT`.
pub const SP_SET_HALT: u32 = 1 << 1;
/// Write bit: clear `BROKE`.
pub const SP_CLR_BROKE: u32 = 1 << 2;
/// Write bit: clear the SP interrupt.
pub const SP_CLR_INTR: u32 = 1 << 3;
/// Write bit: signal the SP interrupt.
pub const SP_SET_INTR: u32 = 1 << 4;
/// Write bit: clear `SSTEP`.
pub const SP_CLR_SSTEP: u32 = 1 << 5;
/// Write bit: set `SSTEP`.
pub const SP_SET_SSTEP: u32 = 1 << 6;
/// Write bit: clear `INTR_BREAK`.
pub const SP_CLR_INTR_BREAK: u32 = 1 << 7;
/// Write bit: set `INTR_BREAK`.
pub const SP_SET_INTR_BREAK: u32 = 1 << 8;

/// Write bit that clears signal `n` (`0..=7`).
#[must_use]
pub const fn sp_clr_sig(n: u32) -> u32 {
    1 << (9 + 2 * n)
}

/// Write bit that sets signal `n` (`0..=7`).
#[must_use]
pub const fn sp_set_sig(n: u32) -> u32 {
    1 << (10 + 2 * n)
}

/// Effect of one `SP_STATUS` write bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCommand {
    /// Clears the given status bit.
    Clear(u32),
    /// Sets the given status bit.
    Set(u32),
    /// Sets the given status bit and, when audio signalling is enabled, also
    /// signals the SP interrupt.
    SetWithAudioSignal(u32),
    /// Clears the pending SP interrupt.
    ClearInterrupt,
    /// Signals the SP interrupt.
    SignalInterrupt,
}

/// Decode table mapping each `SP_STATUS` write bit to its command.
pub const STATUS_WRITE_TABLE: [(u32, StatusCommand); 25] = [
    (SP_CLR_HALT, StatusCommand::Clear(SP_STATUS_HALT)),
    (SP_SET_HALT, StatusCommand::Set(SP_STATUS_HALT)),
    (SP_CLR_BROKE, StatusCommand::Clear(SP_STATUS_BROKE)),
    (SP_CLR_INTR, StatusCommand::ClearInterrupt),
    (SP_SET_INTR, StatusCommand::SignalInterrupt),
    (SP_CLR_SSTEP, StatusCommand::Clear(SP_STATUS_SSTEP)),
    (SP_SET_SSTEP, StatusCommand::Set(SP_STATUS_SSTEP)),
    (SP_CLR_INTR_BREAK, StatusCommand::Clear(SP_STATUS_INTR_BREAK)),
    (SP_SET_INTR_BREAK, StatusCommand::Set(SP_STATUS_INTR_BREAK)),
    (sp_clr_sig(0), StatusCommand::Clear(SP_STATUS_SIG0)),
    (sp_set_sig(0), StatusCommand::SetWithAudioSignal(SP_STATUS_SIG0)),
    (sp_clr_sig(1), StatusCommand::Clear(SP_STATUS_SIG1)),
    (sp_set_sig(1), StatusCommand::Set(SP_STATUS_SIG1)),
    (sp_clr_sig(2), StatusCommand::Clear(SP_STATUS_SIG2)),
    (sp_set_sig(2), StatusCommand::Set(SP_STATUS_SIG2)),
    (sp_clr_sig(3), StatusCommand::Clear(SP_STATUS_SIG3)),
    (sp_set_sig(3), StatusCommand::Set(SP_STATUS_SIG3)),
    (sp_clr_sig(4), StatusCommand::Clear(SP_STATUS_SIG4)),
    (sp_set_sig(4), StatusCommand::Set(SP_STATUS_SIG4)),
    (sp_clr_sig(5), StatusCommand::Clear(SP_STATUS_SIG5)),
    (sp_set_sig(5), StatusCommand::Set(SP_STATUS_SIG5)),
    (sp_clr_sig(6), StatusCommand::Clear(SP_STATUS_SIG6)),
    (sp_set_sig(6), StatusCommand::Set(SP_STATUS_SIG6)),
    (sp_clr_sig(7), StatusCommand::Clear(SP_STATUS_SIG7)),
    (sp_set_sig(7), StatusCommand::Set(SP_STATUS_SIG7)),
];

const _: () = assert_status_table();

const fn assert_status_table() {
    let mut index = 0;
    while index < STATUS_WRITE_TABLE.len() {
        assert!(
            STATUS_WRITE_TABLE[index].0 == 1 << index,
            "write bits must be contiguous from bit 0"
        );
        index += 1;
    }
}

/// Interrupt side effect requested by a status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusSideEffect {
    /// Clear the pending SP interrupt.
    ClearInterrupt,
    /// Signal the SP interrupt.
    SignalInterrupt,
    /// Signal the SP interrupt if audio signalling is enabled.
    AudioSignal,
}

/// Result of decoding one `SP_STATUS` write against the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    /// New `SP_STATUS` value after the clear and set passes.
    pub status: u32,
    /// Interrupt side effects in table order; unused slots are `None`.
    pub side_effects: [Option<StatusSideEffect>; 3],
    /// `true` when the write carried `SP_CLR_HALT` or `SP_CLR_BROKE`.
    pub releases_task: bool,
}

impl StatusUpdate {
    /// Iterates the requested side effects in application order.
    pub fn side_effects(&self) -> impl Iterator<Item = StatusSideEffect> + '_ {
        self.side_effects.iter().flatten().copied()
    }
}

/// Decodes `written` (already masked by the bus lane mask) against `status`.
#[must_use]
pub fn decode_status_write(status: u32, written: u32) -> StatusUpdate {
    let commands = STATUS_WRITE_TABLE
        .iter()
        .filter(|(bit, _)| written & bit != 0)
        .map(|(_, command)| *command);

    let mut clears = 0;
    let mut sets = 0;
    let mut side_effects = [None; 3];
    let mut effect_count = 0;
    let mut push = |effect: StatusSideEffect| {
        side_effects[effect_count] = Some(effect);
        effect_count += 1;
    };

    for command in commands {
        match command {
            StatusCommand::Clear(bit) => clears |= bit,
            StatusCommand::Set(bit) => sets |= bit,
            StatusCommand::SetWithAudioSignal(bit) => {
                sets |= bit;
                push(StatusSideEffect::AudioSignal);
            }
            StatusCommand::ClearInterrupt => push(StatusSideEffect::ClearInterrupt),
            StatusCommand::SignalInterrupt => push(StatusSideEffect::SignalInterrupt),
        }
    }

    StatusUpdate {
        status: (status & !clears) | sets,
        side_effects,
        releases_task: written & (SP_CLR_HALT | SP_CLR_BROKE) != 0,
    }
}
