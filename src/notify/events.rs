// src/notify/events.rs

use crate::types::{TaskId, WorkflowId};

/// Stable identifiers for the events the notification bus fans out.
///
/// Names mirror the vocabulary of the system this engine implements: `Will*`
/// notifications precede an operation's propagation, `Did*` follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskDidStart,
    TaskDidFinish,
    TaskDidFail,
    TaskDidCancel,
    TaskDidReset,
    TaskDidRetry,

    WorkflowWillStart,
    WorkflowWillCancel,
    WorkflowWillReset,
    WorkflowWillRetry,
    WorkflowDidFinish,
    WorkflowTaskDidCancel,
    WorkflowTaskDidFail,
}

/// Who emitted a given notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Task(TaskId),
    Workflow(WorkflowId),
}

/// A single posted event.
///
/// `task` carries the affected task for the two `WorkflowTaskDid*` events;
/// it is `None` otherwise.
#[derive(Debug, Clone)]
pub struct Notification {
    pub subject: Subject,
    pub kind: EventKind,
    pub task: Option<TaskId>,
}
