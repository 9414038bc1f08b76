//! Task classification, raster-freeze deferral, program-counter masking and
//! save states.

#![allow(clippy::pedantic, clippy::nursery)]

mod common;

use common::{
    fire_completion, load_task, rsp, rsp_with, start_task, write_status, HostCall, MockHost,
};
use log as _;
use proptest::prelude::*;
use rsp_core::{
    DispatchOutcome, EventKind, RspConfig, SnapshotError, SpState, TaskKind, TaskState,
    DP_INTERRUPT_DELAY, SP_COMPLETION_DELAY, SP_MEM_WORDS, SP_PC_OFFSET, SP_SET_HALT,
    SP_STATUS_HALT, SP_STATUS_OFFSET,
};
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const GRAPHICS: u32 = 1;
const AUDIO: u32 = 2;

fn frozen_host() -> MockHost {
    MockHost {
        frozen: true,
        ..MockHost::default()
    }
}

#[test]
fn graphics_task_on_frozen_raster_is_deferred() {
    let mut rsp = rsp_with(RspConfig::default(), frozen_host());
    load_task(&mut rsp, GRAPHICS);

    assert_eq!(rsp.dispatch_task(), DispatchOutcome::Deferred);

    assert!(rsp.host().calls.is_empty());
    assert!(rsp.is_graphics_deferred());
    assert_eq!(rsp.task_state(), TaskState::Idle);
    assert_eq!(rsp.diagnostics().deferred_tasks, 1);
    assert_eq!(rsp.diagnostics().tasks_run(), 0);
}

#[test]
fn deferred_graphics_task_runs_once_on_unfreeze() {
    let mut rsp = rsp_with(RspConfig::default(), frozen_host());
    start_task(&mut rsp, GRAPHICS);
    assert!(rsp.host().runs().is_empty());

    rsp.host_mut().frozen = false;
    let outcome = rsp.notify_raster_unfrozen();

    assert_eq!(
        outcome,
        Some(DispatchOutcome::Ran {
            kind: TaskKind::Graphics,
            cycles: 42,
            completion_scheduled: true,
        })
    );
    assert_eq!(rsp.host().runs().len(), 1);
    assert_eq!(rsp.host().scheduled(EventKind::SpInterrupt), 1);
    assert!(!rsp.is_graphics_deferred());

    assert_eq!(rsp.notify_raster_unfrozen(), None);
    assert_eq!(rsp.host().runs().len(), 1);
}

#[test]
fn unfreeze_without_deferred_task_is_ignored() {
    let mut rsp = rsp();
    load_task(&mut rsp, GRAPHICS);
    assert_eq!(rsp.notify_raster_unfrozen(), None);
    assert!(rsp.host().calls.is_empty());
}

#[test]
fn deferred_task_is_dropped_if_halted_before_unfreeze() {
    let mut rsp = rsp_with(RspConfig::default(), frozen_host());
    start_task(&mut rsp, GRAPHICS);
    write_status(&mut rsp, SP_SET_HALT);

    rsp.host_mut().frozen = false;
    assert_eq!(rsp.notify_raster_unfrozen(), None);
    assert!(rsp.host().runs().is_empty());
    assert!(!rsp.is_graphics_deferred());
}

#[test]
fn freeze_check_can_be_skipped() {
    let config = RspConfig {
        skip_raster_freeze_check: true,
        ..RspConfig::default()
    };
    let mut rsp = rsp_with(config, frozen_host());
    start_task(&mut rsp, GRAPHICS);

    assert_eq!(rsp.host().runs().len(), 1);
    assert!(!rsp.is_graphics_deferred());
}

#[test]
fn graphics_task_brackets_the_run_with_framebuffer_protection() {
    let host = MockHost {
        dp_interrupt_flag: true,
        ..MockHost::default()
    };
    let mut rsp = rsp_with(RspConfig::default(), host);
    start_task(&mut rsp, GRAPHICS);

    assert_eq!(
        rsp.host().calls,
        vec![
            HostCall::Unprotect,
            HostCall::Run { pc: 0, hle: false },
            HostCall::NewFrame,
            HostCall::Schedule(EventKind::DpInterrupt, DP_INTERRUPT_DELAY),
            HostCall::Protect,
            HostCall::Schedule(EventKind::SpInterrupt, SP_COMPLETION_DELAY),
        ]
    );
    assert!(!rsp.host().dp_interrupt_flag);
}

#[test]
fn graphics_task_without_raster_interrupt_schedules_no_display_event() {
    let mut rsp = rsp();
    start_task(&mut rsp, GRAPHICS);

    assert_eq!(rsp.host().scheduled(EventKind::DpInterrupt), 0);
    assert_eq!(rsp.host().count(HostCall::Protect), 1);
    assert_eq!(rsp.host().count(HostCall::Unprotect), 1);
}

#[test]
fn display_delay_follows_configuration() {
    let config = RspConfig {
        display_interrupt_delay: 123,
        ..RspConfig::default()
    };
    let host = MockHost {
        dp_interrupt_flag: true,
        ..MockHost::default()
    };
    let mut rsp = rsp_with(config, host);
    start_task(&mut rsp, GRAPHICS);
    assert_eq!(
        rsp.host().count(HostCall::Schedule(EventKind::DpInterrupt, 123)),
        1
    );
}

#[rstest]
#[case(AUDIO, true, true)]
#[case(AUDIO, false, false)]
#[case(0, true, false)]
#[case(3, true, false)]
fn audio_tasks_select_the_configured_executor(
    #[case] tag: u32,
    #[case] hle_audio_lists: bool,
    #[case] hle: bool,
) {
    let config = RspConfig {
        hle_audio_lists,
        ..RspConfig::default()
    };
    let mut rsp = rsp_with(config, MockHost::default());
    start_task(&mut rsp, tag);

    assert_eq!(rsp.host().runs(), vec![HostCall::Run { pc: 0, hle }]);
    assert_eq!(rsp.host().count(HostCall::Protect), 0);
    assert_eq!(rsp.host().count(HostCall::NewFrame), 0);
}

#[test]
fn executor_sees_only_the_local_pc_offset() {
    let mut rsp = rsp();
    rsp.write_pc_reg(SP_PC_OFFSET, 0x0400_1234, u32::MAX);
    start_task(&mut rsp, 0);

    assert_eq!(rsp.host().runs(), vec![HostCall::Run { pc: 0x234, hle: false }]);
    assert_eq!(rsp.read_pc_reg(SP_PC_OFFSET), 0x0400_1234);
}

#[test]
fn pc_high_bits_are_restored_over_the_executor_result() {
    let host = MockHost {
        on_run: Some(Box::new(|sp: &mut SpState| sp.regs.set_pc(0x080))),
        ..MockHost::default()
    };
    let mut rsp = rsp_with(RspConfig::default(), host);
    rsp.write_pc_reg(SP_PC_OFFSET, 0x0400_1FFC, u32::MAX);
    start_task(&mut rsp, AUDIO);

    assert_eq!(rsp.read_pc_reg(SP_PC_OFFSET), 0x0400_1080);
}

#[test]
fn executor_can_touch_local_memory() {
    let host = MockHost {
        on_run: Some(Box::new(|sp: &mut SpState| {
            sp.mem.write_word(0x10, 0x600D_F00D, u32::MAX);
        })),
        ..MockHost::default()
    };
    let mut rsp = rsp_with(RspConfig::default(), host);
    start_task(&mut rsp, 0);
    assert_eq!(rsp.read_mem(0x10), 0x600D_F00D);
}

#[test]
fn diagnostics_count_tasks_by_kind() {
    let mut rsp = rsp();
    rsp.state_mut().regs.set_status(0);
    for tag in [GRAPHICS, AUDIO, AUDIO, 7] {
        load_task(&mut rsp, tag);
        rsp.dispatch_task();
        fire_completion(&mut rsp);
    }

    let diag = rsp.diagnostics();
    assert_eq!(diag.graphics_tasks, 1);
    assert_eq!(diag.audio_tasks, 2);
    assert_eq!(diag.other_tasks, 1);
    assert_eq!(diag.tasks_run(), 4);
    assert_eq!(diag.completions_scheduled, 4);
}

#[test]
fn snapshot_round_trips_into_a_fresh_core() {
    let mut rsp = rsp();
    rsp.write_mem(0x40, 0x1234_5678, u32::MAX);
    rsp.write_pc_reg(SP_PC_OFFSET, 0x0400_1100, u32::MAX);
    start_task(&mut rsp, 0);
    let snapshot = rsp.snapshot();
    assert_eq!(snapshot.mem.len(), SP_MEM_WORDS);

    let mut restored = common::rsp();
    restored.restore(&snapshot).expect("valid snapshot");

    assert_eq!(restored.read_mem(0x40), 0x1234_5678);
    assert_eq!(restored.read_pc_reg(SP_PC_OFFSET), 0x0400_1100);
    assert_eq!(restored.task_state(), TaskState::AwaitingCompletion);
    assert_eq!(restored.snapshot(), snapshot);

    restored.on_completion_event();
    assert_eq!(restored.task_state(), TaskState::Idle);
}

#[test]
fn snapshot_keeps_a_deferred_graphics_task() {
    let mut rsp = rsp_with(RspConfig::default(), frozen_host());
    start_task(&mut rsp, GRAPHICS);
    let snapshot = rsp.snapshot();

    let mut restored = common::rsp();
    restored.restore(&snapshot).expect("valid snapshot");

    assert!(restored.is_graphics_deferred());
    assert!(restored.notify_raster_unfrozen().is_some());
    assert_eq!(restored.host().runs().len(), 1);
}

#[test]
fn halted_core_with_pending_completion_restores() {
    let mut rsp = rsp();
    start_task(&mut rsp, 0);
    write_status(&mut rsp, SP_SET_HALT);
    let snapshot = rsp.snapshot();

    let mut restored = common::rsp();
    restored.restore(&snapshot).expect("valid snapshot");
    assert_eq!(restored.task_state(), TaskState::AwaitingCompletion);
    assert_eq!(restored.read_reg(SP_STATUS_OFFSET), SP_STATUS_HALT);
}

#[test]
fn short_memory_image_is_rejected_without_side_effects() {
    let mut rsp = rsp();
    rsp.write_mem(0x0, 0xAAAA_5555, u32::MAX);
    let mut snapshot = rsp.snapshot();
    snapshot.mem.truncate(16);

    assert_eq!(
        rsp.restore(&snapshot),
        Err(SnapshotError::LocalMemoryLength {
            expected: SP_MEM_WORDS,
            actual: 16,
        })
    );
    assert_eq!(rsp.read_mem(0x0), 0xAAAA_5555);
    assert_eq!(rsp.read_reg(SP_STATUS_OFFSET), SP_STATUS_HALT);
}

#[test]
fn inconsistent_snapshots_are_rejected() {
    let mut rsp = rsp();
    let mut snapshot = rsp.snapshot();

    snapshot.version = 2;
    assert_eq!(
        rsp.restore(&snapshot),
        Err(SnapshotError::UnsupportedVersion(2))
    );

    snapshot.version = 1;
    snapshot.task_state = TaskState::Running;
    assert_eq!(
        rsp.restore(&snapshot),
        Err(SnapshotError::InconsistentTaskState {
            state: TaskState::Running,
            status: SP_STATUS_HALT,
        })
    );
    assert_eq!(rsp.task_state(), TaskState::Idle);
}

proptest! {
    #[test]
    fn property_unknown_tags_run_once_on_the_primary_executor(
        tag in any::<u32>().prop_filter("known tag", |tag| *tag != GRAPHICS && *tag != AUDIO),
        pc in any::<u32>(),
    ) {
        let config = RspConfig {
            hle_audio_lists: true,
            ..RspConfig::default()
        };
        let mut rsp = rsp_with(config, MockHost::default());
        rsp.write_pc_reg(SP_PC_OFFSET, pc, u32::MAX);
        start_task(&mut rsp, tag);

        prop_assert_eq!(
            rsp.host().runs(),
            vec![HostCall::Run { pc: pc & 0xFFF, hle: false }]
        );
        prop_assert_eq!(rsp.read_pc_reg(SP_PC_OFFSET), pc);
        prop_assert_eq!(rsp.diagnostics().other_tasks, 1);
        prop_assert_eq!(rsp.task_state(), TaskState::AwaitingCompletion);
    }
}
