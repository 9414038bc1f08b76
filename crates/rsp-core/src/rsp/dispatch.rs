use log::debug;

use super::Rsp;
use crate::{
    DispatchOutcome, EventKind, RspHost, TaskKind, TaskState, SP_PC_OFFSET_MASK,
};

/// Local-memory byte offset of the task type tag.
pub const TASK_TYPE_OFFSET: u32 = 0xFC0;

#[derive(Clone, Copy)]
enum Executor {
    Primary,
    AudioHle,
}

impl<H: RspHost> Rsp<H> {
    /// Dispatches the task currently loaded in local memory.
    ///
    /// Graphics tasks are deferred while the raster stage is frozen (unless
    /// [`crate::RspConfig::skip_raster_freeze_check`] is set) and resumed by
    /// [`Rsp::notify_raster_unfrozen`]. After a run, a coprocessor that is
    /// neither halted nor broken gets a completion interrupt scheduled and the
    /// dispatch guard moves to [`TaskState::AwaitingCompletion`].
    pub fn dispatch_task(&mut self) -> DispatchOutcome {
        let kind = TaskKind::from_tag(self.state.mem.read_word(TASK_TYPE_OFFSET));

        let cycles = match kind {
            TaskKind::Graphics => {
                if !self.config.skip_raster_freeze_check && self.host.is_frozen() {
                    debug!("sp: raster stage frozen, deferring graphics task");
                    self.graphics_deferred = true;
                    self.diag.record_deferred();
                    return DispatchOutcome::Deferred;
                }
                self.run_graphics_task()
            }
            TaskKind::Audio => {
                let executor = if self.config.hle_audio_lists {
                    Executor::AudioHle
                } else {
                    Executor::Primary
                };
                self.run_with_masked_pc(executor)
            }
            TaskKind::Other(tag) => {
                debug!("sp: unknown task type {tag:#x}, running on primary executor");
                self.run_with_masked_pc(Executor::Primary)
            }
        };

        self.graphics_deferred = false;
        self.diag.record_task(kind);
        self.task = TaskState::Idle;

        let completion_scheduled = !self.state.regs.is_stopped();
        if completion_scheduled {
            self.task = TaskState::AwaitingCompletion;
            self.host
                .schedule_event(EventKind::SpInterrupt, self.config.completion_interrupt_delay);
            self.diag.record_completion_scheduled();
        }

        debug!(
            "sp: {kind:?} task ran for {cycles} cycles, completion scheduled: {completion_scheduled}"
        );

        DispatchOutcome::Ran {
            kind,
            cycles,
            completion_scheduled,
        }
    }

    fn run_graphics_task(&mut self) -> u32 {
        self.host.unprotect_framebuffers();
        let cycles = self.run_with_masked_pc(Executor::Primary);
        self.host.new_frame();

        if self.host.consume_interrupt_flag() {
            self.host
                .schedule_event(EventKind::DpInterrupt, self.config.display_interrupt_delay);
            debug!("sp: graphics task finished with dp interrupt pending");
        }

        self.host.protect_framebuffers();
        cycles
    }

    /// Runs the executor with `SP_PC` reduced to its local-memory offset and
    /// restores the saved high bits afterwards.
    fn run_with_masked_pc(&mut self, executor: Executor) -> u32 {
        let saved_high = self.state.regs.pc() & !SP_PC_OFFSET_MASK;
        self.state
            .regs
            .set_pc(self.state.regs.pc() & SP_PC_OFFSET_MASK);

        self.task = TaskState::Running;
        let budget = self.config.max_task_cycles;
        let cycles = match executor {
            Executor::Primary => self.host.run_until_yield(&mut self.state, budget),
            Executor::AudioHle => self.host.run_audio_hle(&mut self.state, budget),
        };

        self.state.regs.set_pc(self.state.regs.pc() | saved_high);
        cycles
    }
}
