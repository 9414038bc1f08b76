#![no_main]

use libfuzzer_sys::fuzz_target;
use rsp_core::{
    EventKind, EventTimeline, InterruptController, InterruptSource, RasterStage, Rdram, RdramBus,
    Rsp, RspConfig, SpState, TaskExecutor,
};

struct FuzzHost {
    rdram: Rdram,
    pending_completion: bool,
    frozen: bool,
}

impl InterruptController for FuzzHost {
    fn raise_interrupt(&mut self, _source: InterruptSource) {}
    fn clear_interrupt(&mut self, _source: InterruptSource) {}
    fn signal_interrupt(&mut self, _source: InterruptSource) {}
}

impl EventTimeline for FuzzHost {
    fn schedule_event(&mut self, kind: EventKind, _delay: u32) {
        if kind == EventKind::SpInterrupt {
            self.pending_completion = true;
        }
    }

    fn is_event_pending(&self, kind: EventKind) -> bool {
        kind == EventKind::SpInterrupt && self.pending_completion
    }
}

impl RasterStage for FuzzHost {
    fn is_frozen(&self) -> bool {
        self.frozen
    }
    fn protect_framebuffers(&mut self) {}
    fn unprotect_framebuffers(&mut self) {}
    fn consume_interrupt_flag(&mut self) -> bool {
        false
    }
}

impl RdramBus for FuzzHost {
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

impl TaskExecutor for FuzzHost {
    fn run_until_yield(&mut self, sp: &mut SpState, _max_cycles: u32) -> u32 {
        sp.regs.pc()
    }
}

fuzz_target!(|data: &[u8]| {
    let host = FuzzHost {
        rdram: Rdram::new(0x1_0000),
        pending_completion: false,
        frozen: false,
    };
    let mut rsp = Rsp::new(RspConfig::default(), host);

    for op in data.chunks_exact(9) {
        let address = u32::from_be_bytes([op[1], op[2], op[3], op[4]]);
        let value = u32::from_be_bytes([op[5], op[6], op[7], op[8]]);
        match op[0] % 8 {
            0 => rsp.write_reg(address, value, u32::MAX),
            1 => rsp.write_reg(address, value, address.rotate_left(8)),
            2 => {
                let _ = rsp.read_reg(address);
            }
            3 => rsp.write_mem(address, value, u32::MAX),
            4 => rsp.write_pc_reg(address, value, u32::MAX),
            5 => {
                if std::mem::take(&mut rsp.host_mut().pending_completion) {
                    rsp.on_completion_event();
                }
            }
            6 => rsp.host_mut().frozen = value & 1 != 0,
            _ => {
                if !rsp.host().frozen {
                    let _ = rsp.notify_raster_unfrozen();
                }
            }
        }

        assert!(rsp.snapshot().validate().is_ok());
        if rsp.host().pending_completion {
            assert!(rsp.task_state().is_locked());
        }
    }
});
