/// Dispatch guard for the single task slot.
///
/// Replaces the bare "task locked" flag with explicit states so that re-entrant
/// status writes can tell a finished task with an outstanding completion
/// interrupt apart from an idle coprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TaskState {
    /// No task is running and no completion interrupt is outstanding.
    #[default]
    Idle,
    /// The executor is inside a synchronous task run.
    Running,
    /// A task ran and its completion interrupt is scheduled but has not fired.
    AwaitingCompletion,
}

impl TaskState {
    /// Returns `true` while a completion interrupt is outstanding.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::AwaitingCompletion)
    }
}
