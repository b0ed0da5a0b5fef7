// src/workflow/lifecycle.rs

use std::sync::atomic::Ordering;

use tracing::debug;

use crate::notify::{EventKind, Notification, Subject};
use crate::task::Task;
use crate::types::TaskId;

use super::Workflow;

impl Workflow {
    /// Signal every prerequisite-less task to begin. Fires
    /// `WorkflowDidFinish` immediately if the workflow has no tasks.
    pub fn start(&self) {
        self.0.active.store(true, Ordering::SeqCst);
        self.0.finished_fired.store(false, Ordering::SeqCst);
        if let Some(d) = self.delegate() {
            d.workflow_will_start(self);
        }
        self.post(EventKind::WorkflowWillStart, None);
        debug!(workflow = %self.name(), "workflow starting");
        for root in self.tasks_with_no_prerequisite_tasks() {
            root.start();
        }
        self.check_completion();
    }

    /// Advisory cancellation of the whole graph: signals roots, which
    /// propagate the cancel down through dependents.
    pub fn cancel(&self) {
        if let Some(d) = self.delegate() {
            d.workflow_will_cancel(self);
        }
        self.post(EventKind::WorkflowWillCancel, None);
        for root in self.tasks_with_no_prerequisite_tasks() {
            root.cancel();
        }
    }

    /// Reset every task back to `Pending`/`Ready`, clearing results/errors.
    pub fn reset(&self) {
        self.0.finished_fired.store(false, Ordering::SeqCst);
        if let Some(d) = self.delegate() {
            d.workflow_will_reset(self);
        }
        self.post(EventKind::WorkflowWillReset, None);
        for root in self.tasks_with_no_prerequisite_tasks() {
            root.reset();
        }
    }

    /// Retry every `Cancelled`/`Failed` task and resume dispatch.
    pub fn retry(&self) {
        self.0.finished_fired.store(false, Ordering::SeqCst);
        if let Some(d) = self.delegate() {
            d.workflow_will_retry(self);
        }
        self.post(EventKind::WorkflowWillRetry, None);
        for root in self.tasks_with_no_prerequisite_tasks() {
            root.retry();
        }
    }

    pub(crate) fn on_task_finished(&self, task: &Task) {
        for dependent in task.dependents_snapshot() {
            let became_ready = dependent.try_mark_ready();
            if became_ready && self.is_active() {
                dependent.start();
            }
        }
        self.check_completion();
    }

    pub(crate) fn on_task_failed(&self, task: &Task) {
        if let Some(d) = self.delegate() {
            d.workflow_task_did_fail(self, task);
        }
        self.post(EventKind::WorkflowTaskDidFail, Some(task.id()));
    }

    pub(crate) fn on_task_cancelled(&self, task: &Task) {
        if let Some(d) = self.delegate() {
            d.workflow_task_did_cancel(self, task);
        }
        self.post(EventKind::WorkflowTaskDidCancel, Some(task.id()));
    }

    /// Fires `WorkflowDidFinish` at most once per "run" (a run begins at
    /// `start`/`reset`/`retry`), the instant every task reaches `Finished`.
    fn check_completion(&self) {
        let all_finished = {
            let tasks = self.0.tasks.lock().unwrap();
            tasks.values().all(|t| t.is_finished())
        };
        if !all_finished {
            return;
        }
        if self
            .0
            .finished_fired
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            debug!(workflow = %self.name(), "workflow finished");
            if let Some(d) = self.delegate() {
                d.workflow_did_finish(self);
            }
            self.post(EventKind::WorkflowDidFinish, None);
        }
    }

    fn post(&self, kind: EventKind, task: Option<TaskId>) {
        self.0.bus.post(Notification {
            subject: Subject::Workflow(self.id()),
            kind,
            task,
        });
    }
}
