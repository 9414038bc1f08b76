//! Save-state format for the coprocessor.

use thiserror::Error;

use crate::{ControlRegister, SpRegisters, TaskState, CONTROL_REGISTER_COUNT, PC_REGISTER_COUNT};

/// Stable snapshot wire-version identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum SnapshotVersion {
    /// Initial layout: local memory, both banks, dispatch guard.
    V1 = 1,
}

impl SnapshotVersion {
    /// Converts wire value to known snapshot version.
    #[must_use]
    pub const fn from_u16(version: u16) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            _ => None,
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Reasons a snapshot cannot be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The snapshot was written by an unknown format revision.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u16),
    /// The local-memory image does not cover exactly 8 KiB.
    #[error("local memory image has {actual} words, expected {expected}")]
    LocalMemoryLength {
        /// Required word count.
        expected: usize,
        /// Word count found in the snapshot.
        actual: usize,
    },
    /// The snapshot was captured while a task was executing.
    #[error("task state {state:?} is inconsistent with SP_STATUS {status:#x}")]
    InconsistentTaskState {
        /// Saved dispatch guard state.
        state: TaskState,
        /// Saved `SP_STATUS` value.
        status: u32,
    },
}

/// Serializable coprocessor save state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RspSnapshot {
    /// Raw snapshot format version.
    pub version: u16,
    /// Local memory as big-endian words in address order.
    pub mem: Vec<u32>,
    /// Control bank.
    pub regs: [u32; CONTROL_REGISTER_COUNT],
    /// Secondary bank.
    pub regs2: [u32; PC_REGISTER_COUNT],
    /// Dispatch guard.
    pub task_state: TaskState,
    /// A graphics task was waiting for the raster stage to unfreeze.
    pub graphics_deferred: bool,
}

impl RspSnapshot {
    /// Checks the version and dispatch-guard consistency.
    ///
    /// A snapshot never captures a task mid-run. A pending completion may
    /// coexist with any status, since the host can halt the coprocessor
    /// before the completion event fires.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedVersion`] or
    /// [`SnapshotError::InconsistentTaskState`].
    pub fn validate(&self) -> Result<SnapshotVersion, SnapshotError> {
        let version = SnapshotVersion::from_u16(self.version)
            .ok_or(SnapshotError::UnsupportedVersion(self.version))?;

        if self.task_state == TaskState::Running {
            return Err(SnapshotError::InconsistentTaskState {
                state: self.task_state,
                status: self.regs[ControlRegister::Status.index()],
            });
        }

        Ok(version)
    }

    /// Rebuilds the register banks held by this snapshot.
    #[must_use]
    pub const fn registers(&self) -> SpRegisters {
        SpRegisters::from_raw(self.regs, self.regs2)
    }
}
