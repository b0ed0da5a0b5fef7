// src/types.rs

//! Small shared identifiers and type-erasure aliases used across the crate.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier for a [`crate::task::Task`], unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        TaskId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identifier for a [`crate::workflow::Workflow`], unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkflowId(u64);

impl WorkflowId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        WorkflowId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A key identifying one of a task's keyed prerequisites.
pub type PrerequisiteKey = String;

/// Type-erased task result. The engine never interprets the payload.
pub type DynValue = Arc<dyn Any + Send + Sync>;

/// Type-erased user-task failure.
pub type DynError = Arc<dyn std::error::Error + Send + Sync>;

/// Wrap any owned value as a [`DynValue`].
pub fn value<T: Any + Send + Sync + 'static>(v: T) -> DynValue {
    Arc::new(v)
}
