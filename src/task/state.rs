// src/task/state.rs

/// The six states a [`crate::task::Task`] moves through over its lifetime.
/// A task may pass through this machine many times via `reset`/`retry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Pending,
    Ready,
    Executing,
    Cancelled,
    Finished,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Finished | TaskState::Cancelled | TaskState::Failed)
    }
}
