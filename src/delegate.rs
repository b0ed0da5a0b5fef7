// src/delegate.rs

//! Observer traits. These are the other of the two views onto the
//! transition stream described in [`crate::notify`]; delegate calls fire
//! before the matching notification is posted.

use crate::task::Task;
use crate::workflow::Workflow;

/// Per-task observer. All methods have empty default bodies so callers
/// only implement the ones they care about.
pub trait TaskDelegate: Send + Sync {
    fn task_did_start(&self, _task: &Task) {}
    fn task_did_finish(&self, _task: &Task) {}
    fn task_did_fail(&self, _task: &Task) {}
    fn task_did_cancel(&self, _task: &Task) {}
    fn task_did_reset(&self, _task: &Task) {}
    fn task_did_retry(&self, _task: &Task) {}
}

/// Per-workflow observer.
pub trait WorkflowDelegate: Send + Sync {
    fn workflow_will_start(&self, _workflow: &Workflow) {}
    fn workflow_will_cancel(&self, _workflow: &Workflow) {}
    fn workflow_will_reset(&self, _workflow: &Workflow) {}
    fn workflow_will_retry(&self, _workflow: &Workflow) {}
    fn workflow_did_finish(&self, _workflow: &Workflow) {}
    fn workflow_task_did_cancel(&self, _workflow: &Workflow, _task: &Task) {}
    fn workflow_task_did_fail(&self, _workflow: &Workflow, _task: &Task) {}
}
