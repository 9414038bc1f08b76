//! Shared recording host used by the integration suites.

#![allow(dead_code)]

use rsp_core::{
    EventKind, EventTimeline, InterruptController, InterruptSource, RasterStage, Rdram, RdramBus,
    Rsp, RspConfig, SpState, TaskExecutor, SP_CLR_HALT, SP_STATUS_OFFSET, TASK_TYPE_OFFSET,
};

/// Every externally visible action the coprocessor performed on its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Raise(InterruptSource),
    Clear(InterruptSource),
    Signal(InterruptSource),
    Schedule(EventKind, u32),
    Protect,
    Unprotect,
    NewFrame,
    Run { pc: u32, hle: bool },
}

type RunHook = Box<dyn FnMut(&mut SpState)>;

pub struct MockHost {
    pub rdram: Rdram,
    pub calls: Vec<HostCall>,
    pub pending: Vec<EventKind>,
    pub frozen: bool,
    pub dp_interrupt_flag: bool,
    pub cycles: u32,
    pub on_run: Option<RunHook>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            rdram: Rdram::new(0x10_0000),
            calls: Vec::new(),
            pending: Vec::new(),
            frozen: false,
            dp_interrupt_flag: false,
            cycles: 42,
            on_run: None,
        }
    }
}

impl MockHost {
    /// Halts the coprocessor from inside every task run.
    pub fn halting() -> Self {
        Self {
            on_run: Some(Box::new(|sp: &mut SpState| {
                let status = sp.regs.status();
                sp.regs.set_status(status | rsp_core::SP_STATUS_HALT);
            })),
            ..Self::default()
        }
    }

    pub fn runs(&self) -> Vec<HostCall> {
        self.calls
            .iter()
            .copied()
            .filter(|call| matches!(call, HostCall::Run { .. }))
            .collect()
    }

    pub fn scheduled(&self, kind: EventKind) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::Schedule(k, _) if *k == kind))
            .count()
    }

    pub fn count(&self, wanted: HostCall) -> usize {
        self.calls.iter().filter(|call| **call == wanted).count()
    }

    /// Removes one pending event of `kind`, returning whether it was pending.
    pub fn fire(&mut self, kind: EventKind) -> bool {
        match self.pending.iter().position(|pending| *pending == kind) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    fn record_run(&mut self, sp: &mut SpState, hle: bool) -> u32 {
        self.calls.push(HostCall::Run {
            pc: sp.regs.pc(),
            hle,
        });
        if let Some(hook) = self.on_run.as_mut() {
            hook(sp);
        }
        self.cycles
    }
}

impl InterruptController for MockHost {
    fn raise_interrupt(&mut self, source: InterruptSource) {
        self.calls.push(HostCall::Raise(source));
    }

    fn clear_interrupt(&mut self, source: InterruptSource) {
        self.calls.push(HostCall::Clear(source));
    }

    fn signal_interrupt(&mut self, source: InterruptSource) {
        self.calls.push(HostCall::Signal(source));
    }
}

impl EventTimeline for MockHost {
    fn schedule_event(&mut self, kind: EventKind, delay: u32) {
        self.calls.push(HostCall::Schedule(kind, delay));
        self.pending.push(kind);
    }

    fn is_event_pending(&self, kind: EventKind) -> bool {
        self.pending.contains(&kind)
    }
}

impl RasterStage for MockHost {
    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn protect_framebuffers(&mut self) {
        self.calls.push(HostCall::Protect);
    }

    fn unprotect_framebuffers(&mut self) {
        self.calls.push(HostCall::Unprotect);
    }

    fn consume_interrupt_flag(&mut self) -> bool {
        std::mem::take(&mut self.dp_interrupt_flag)
    }

    fn new_frame(&mut self) {
        self.calls.push(HostCall::NewFrame);
    }
}

impl RdramBus for MockHost {
    fn size(&self) -> u32 {
        self.rdram.size()
    }

    fn read_byte(&self, address: u32) -> u8 {
        self.rdram.read_byte(address)
    }

    fn write_byte(&mut self, address: u32, value: u8) {
        self.rdram.write_byte(address, value);
    }
}

impl TaskExecutor for MockHost {
    fn run_until_yield(&mut self, sp: &mut SpState, _max_cycles: u32) -> u32 {
        self.record_run(sp, false)
    }

    fn run_audio_hle(&mut self, sp: &mut SpState, _max_cycles: u32) -> u32 {
        self.record_run(sp, true)
    }
}

pub fn rsp_with(config: RspConfig, host: MockHost) -> Rsp<MockHost> {
    Rsp::new(config, host)
}

pub fn rsp() -> Rsp<MockHost> {
    rsp_with(RspConfig::default(), MockHost::default())
}

pub fn load_task(rsp: &mut Rsp<MockHost>, tag: u32) {
    rsp.write_mem(TASK_TYPE_OFFSET, tag, u32::MAX);
}

pub fn write_status(rsp: &mut Rsp<MockHost>, bits: u32) {
    rsp.write_reg(SP_STATUS_OFFSET, bits, u32::MAX);
}

pub fn start_task(rsp: &mut Rsp<MockHost>, tag: u32) {
    load_task(rsp, tag);
    write_status(rsp, SP_CLR_HALT);
}

/// Fires the completion event the way the host timeline would.
pub fn fire_completion(rsp: &mut Rsp<MockHost>) {
    assert!(rsp.host_mut().fire(EventKind::SpInterrupt));
    rsp.on_completion_event();
}
