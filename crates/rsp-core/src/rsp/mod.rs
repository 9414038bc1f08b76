//! The coprocessor: register banks, local memory and their bus endpoints.

/// Task dispatcher and interrupt bridge.
mod dispatch;

pub use dispatch::TASK_TYPE_OFFSET;

use log::{debug, trace};

use crate::{
    decode_control_register, decode_pc_register, decode_status_write, masked_write, run_dma,
    ControlRegister, DispatchOutcome, DmaDirection, DmaRequest, EventKind, InterruptSource,
    RspConfig, RspDiagnostics, RspHost, RspSnapshot, SnapshotError, SnapshotVersion, SpState,
    StatusSideEffect, TaskState, SP_MEM_WORDS, SP_STATUS_INTR_BREAK,
};

/// Coprocessor control core bound to its host machine.
///
/// All register, memory and dispatch operations run synchronously on the
/// caller's thread. The only deferred work is the completion interrupt, which
/// the host's timeline later delivers through [`Rsp::on_completion_event`].
#[derive(Debug)]
pub struct Rsp<H> {
    state: SpState,
    task: TaskState,
    graphics_deferred: bool,
    config: RspConfig,
    diag: RspDiagnostics,
    host: H,
}

impl<H: RspHost> Rsp<H> {
    /// Creates a powered-on coprocessor wired to `host`.
    #[must_use]
    pub fn new(config: RspConfig, host: H) -> Self {
        let mut rsp = Self {
            state: SpState::default(),
            task: TaskState::Idle,
            graphics_deferred: false,
            config,
            diag: RspDiagnostics::default(),
            host,
        };
        rsp.power_on();
        rsp
    }

    /// Applies power-on/reset: memory and banks zeroed, `SP_STATUS` halted,
    /// dispatch guard idle.
    pub fn power_on(&mut self) {
        self.state.power_on();
        self.task = TaskState::Idle;
        self.graphics_deferred = false;
        self.diag.reset();
    }

    /// Returns the coprocessor state.
    #[must_use]
    pub const fn state(&self) -> &SpState {
        &self.state
    }

    /// Returns the coprocessor state for direct host manipulation.
    #[must_use]
    pub fn state_mut(&mut self) -> &mut SpState {
        &mut self.state
    }

    /// Returns the host collaborators.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host collaborators mutably.
    #[must_use]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the coprocessor and returns its host.
    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RspConfig {
        &self.config
    }

    /// Returns the activity counters.
    #[must_use]
    pub const fn diagnostics(&self) -> &RspDiagnostics {
        &self.diag
    }

    /// Returns the dispatch guard state.
    #[must_use]
    pub const fn task_state(&self) -> TaskState {
        self.task
    }

    /// Returns `true` when a graphics task waits for the raster stage to unfreeze.
    #[must_use]
    pub const fn is_graphics_deferred(&self) -> bool {
        self.graphics_deferred
    }

    /// Reads the local-memory word at `address`.
    #[must_use]
    pub fn read_mem(&self, address: u32) -> u32 {
        self.state.mem.read_word(address)
    }

    /// Masked write of the local-memory word at `address`.
    pub fn write_mem(&mut self, address: u32, value: u32, mask: u32) {
        self.state.mem.write_word(address, value, mask);
    }

    /// Reads a control-bank register.
    ///
    /// Reading `SP_SEMAPHORE` returns its value and then acquires it (sets 1).
    pub fn read_reg(&mut self, address: u32) -> u32 {
        let reg = decode_control_register(address);
        let value = self.state.regs.get(reg);
        if reg == ControlRegister::Semaphore {
            self.state.regs.set(reg, 1);
        }
        value
    }

    /// Masked write of a control-bank register, including its side effects.
    pub fn write_reg(&mut self, address: u32, value: u32, mask: u32) {
        let reg = decode_control_register(address);

        if reg == ControlRegister::Status {
            self.update_status(value & mask);
            return;
        }
        if reg.is_read_only() {
            return;
        }

        let old = self.state.regs.get(reg);
        self.state.regs.set(reg, masked_write(old, value, mask));

        match reg {
            ControlRegister::RdLen => self.start_dma(DmaDirection::ToLocal),
            ControlRegister::WrLen => self.start_dma(DmaDirection::ToMain),
            ControlRegister::Semaphore => self.state.regs.set(reg, 0),
            _ => {}
        }
    }

    /// Reads a secondary-bank register.
    #[must_use]
    pub fn read_pc_reg(&self, address: u32) -> u32 {
        self.state.regs.get_pc_bank(decode_pc_register(address))
    }

    /// Masked write of a secondary-bank register.
    pub fn write_pc_reg(&mut self, address: u32, value: u32, mask: u32) {
        let reg = decode_pc_register(address);
        let old = self.state.regs.get_pc_bank(reg);
        self.state
            .regs
            .set_pc_bank(reg, masked_write(old, value, mask));
    }

    /// Delivers the completion interrupt scheduled by a task run.
    ///
    /// Called by the host when its timeline fires [`EventKind::SpInterrupt`].
    pub fn on_completion_event(&mut self) {
        if self.task.is_locked() {
            self.task = TaskState::Idle;
        }
        if self.state.regs.status_has(SP_STATUS_INTR_BREAK) {
            self.host.raise_interrupt(InterruptSource::Sp);
            self.diag.record_completion_raised();
        }
    }

    /// Resumes a graphics task deferred on a frozen raster stage.
    ///
    /// The raster stage calls this once when it leaves the frozen state.
    /// Returns `None` when nothing was deferred or the coprocessor has since
    /// been halted.
    pub fn notify_raster_unfrozen(&mut self) -> Option<DispatchOutcome> {
        if !std::mem::take(&mut self.graphics_deferred) {
            return None;
        }
        if self.state.regs.is_stopped() {
            debug!("sp: dropping deferred graphics task, coprocessor stopped");
            return None;
        }
        debug!("sp: raster unfrozen, resuming deferred graphics task");
        Some(self.dispatch_task())
    }

    /// Captures a save state of the coprocessor (the host is not included).
    #[must_use]
    pub fn snapshot(&self) -> RspSnapshot {
        RspSnapshot {
            version: SnapshotVersion::V1.as_u16(),
            mem: self.state.mem.words().to_vec(),
            regs: self.state.regs.control_bank(),
            regs2: self.state.regs.pc_bank(),
            task_state: self.task,
            graphics_deferred: self.graphics_deferred,
        }
    }

    /// Loads a save state captured by [`Rsp::snapshot`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot version is unknown, the
    /// local-memory image has the wrong size, or the snapshot was captured
    /// mid-run. State is untouched on error.
    pub fn restore(&mut self, snapshot: &RspSnapshot) -> Result<(), SnapshotError> {
        snapshot.validate()?;
        if !self.state.mem.load_words(&snapshot.mem) {
            return Err(SnapshotError::LocalMemoryLength {
                expected: SP_MEM_WORDS,
                actual: snapshot.mem.len(),
            });
        }
        self.state.regs = snapshot.registers();
        self.task = snapshot.task_state;
        self.graphics_deferred = snapshot.graphics_deferred;
        Ok(())
    }

    fn update_status(&mut self, written: u32) {
        let update = decode_status_write(self.state.regs.status(), written);
        trace!(
            "sp status write {written:#010x}: {:#06x} -> {:#06x}",
            self.state.regs.status(),
            update.status
        );
        self.state.regs.set_status(update.status);

        for effect in update.side_effects() {
            match effect {
                StatusSideEffect::ClearInterrupt => self.host.clear_interrupt(InterruptSource::Sp),
                StatusSideEffect::SignalInterrupt => {
                    self.host.signal_interrupt(InterruptSource::Sp);
                }
                StatusSideEffect::AudioSignal => {
                    if self.config.audio_signal {
                        self.host.signal_interrupt(InterruptSource::Sp);
                    }
                }
            }
        }

        if self.task.is_locked() && self.host.is_event_pending(EventKind::SpInterrupt) {
            return;
        }
        if !update.releases_task && !self.task.is_locked() {
            return;
        }
        if !self.state.regs.is_stopped() {
            self.dispatch_task();
        }
    }

    fn start_dma(&mut self, direction: DmaDirection) {
        let len_reg = match direction {
            DmaDirection::ToLocal => self.state.regs.get(ControlRegister::RdLen),
            DmaDirection::ToMain => self.state.regs.get(ControlRegister::WrLen),
        };
        let request = DmaRequest::decode(direction, len_reg);
        let bytes = run_dma(
            &mut self.state.mem,
            &mut self.host,
            self.state.regs.get(ControlRegister::MemAddr),
            self.state.regs.get(ControlRegister::DramAddr),
            request,
        );
        self.diag.record_dma(direction, bytes);
    }
}
