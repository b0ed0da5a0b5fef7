// src/task/mod.rs

//! Tasks: the unit of work in the graph.
//!
//! [`Task`] is a cheap, `Clone`-able handle (`Arc`-backed) around
//! [`core::TaskInner`]. Prerequisite, dependent and workflow back-references
//! are all weak: the owning [`crate::workflow::Workflow`] is the sole strong
//! owner of its tasks, which avoids the reference cycles a naive
//! all-strong graph would create.

pub mod closure;
pub mod condition;
pub mod core;
pub mod state;
pub mod subworkflow;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::time::Instant;

use tracing::{debug, warn};

use crate::delegate::TaskDelegate;
use crate::notify::{EventKind, Notification, Subject};
use crate::types::{DynError, DynValue, TaskId};
use crate::workflow::{Workflow, WorkflowInner};

pub use self::closure::ClosureTask;
pub use self::condition::ConditionTask;
pub use self::core::TaskBody;
pub use self::state::TaskState;
pub use self::subworkflow::SubworkflowTask;

use self::core::TaskInner;

/// A handle to one node in a workflow's task graph.
#[derive(Clone)]
pub struct Task(pub(crate) Arc<TaskInner>);

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("state", &self.state())
            .finish()
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}
impl Eq for Task {}

impl std::hash::Hash for Task {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl Task {
    /// Construct a task around an arbitrary [`TaskBody`]. Built-in variants
    /// ([`ClosureTask`], [`ConditionTask`], [`SubworkflowTask`]) call this;
    /// user code may too, for a fully custom execution capability.
    pub fn with_body(
        name: impl Into<String>,
        required_prerequisite_keys: impl IntoIterator<Item = String>,
        body: Arc<dyn TaskBody>,
    ) -> Task {
        Task(TaskInner::new(
            name,
            required_prerequisite_keys.into_iter().collect(),
            body,
        ))
    }

    /// Convenience: a task whose body is a plain closure. The closure must
    /// itself call `finish`/`fail` on the task handle it is given.
    pub fn closure(
        name: impl Into<String>,
        body: impl Fn(&Task) + Send + Sync + 'static,
    ) -> Task {
        ClosureTask::new(name, HashSet::new(), body).into_task()
    }

    pub fn id(&self) -> TaskId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn state(&self) -> TaskState {
        self.0.mutable.lock().unwrap().state
    }

    pub fn is_pending(&self) -> bool {
        self.state() == TaskState::Pending
    }
    pub fn is_ready(&self) -> bool {
        self.state() == TaskState::Ready
    }
    pub fn is_executing(&self) -> bool {
        self.state() == TaskState::Executing
    }
    pub fn is_cancelled(&self) -> bool {
        self.state() == TaskState::Cancelled
    }
    pub fn is_finished(&self) -> bool {
        self.state() == TaskState::Finished
    }
    pub fn is_failed(&self) -> bool {
        self.state() == TaskState::Failed
    }

    pub fn required_prerequisite_keys(&self) -> &HashSet<String> {
        &self.0.required_prerequisite_keys
    }

    pub fn finish_date(&self) -> Option<Instant> {
        self.0.mutable.lock().unwrap().finish_date
    }

    pub fn workflow(&self) -> Option<Workflow> {
        self.0
            .workflow
            .lock()
            .unwrap()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Workflow::from_inner)
    }

    pub fn set_delegate(&self, delegate: Arc<dyn TaskDelegate>) {
        *self.0.delegate.lock().unwrap() = Some(delegate);
    }

    fn delegate(&self) -> Option<Arc<dyn TaskDelegate>> {
        self.0.delegate.lock().unwrap().clone()
    }

    // ---- result access -----------------------------------------------

    /// Downcast the stored result to `T`, if the task is Finished and its
    /// result is in fact a `T`.
    pub fn result<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let mutable = self.0.mutable.lock().unwrap();
        mutable
            .result
            .clone()
            .and_then(|v| v.downcast::<T>().ok())
    }

    pub fn result_value(&self) -> Option<DynValue> {
        self.0.mutable.lock().unwrap().result.clone()
    }

    pub fn error(&self) -> Option<DynError> {
        self.0.mutable.lock().unwrap().error.clone()
    }

    pub fn any_prerequisite_result(&self) -> Option<DynValue> {
        self.all_prerequisite_results().into_iter().flatten().next()
    }

    pub fn all_prerequisite_results(&self) -> Vec<Option<DynValue>> {
        self.prerequisites_snapshot()
            .into_iter()
            .map(|p| p.result_value())
            .collect()
    }

    pub fn all_unkeyed_prerequisite_results(&self) -> Vec<Option<DynValue>> {
        self.unkeyed_prerequisites_snapshot()
            .into_iter()
            .map(|p| p.result_value())
            .collect()
    }

    pub fn keyed_prerequisite_results(&self) -> HashMap<String, Option<DynValue>> {
        self.keyed_prerequisites_snapshot()
            .into_iter()
            .map(|(k, t)| (k, t.result_value()))
            .collect()
    }

    pub fn prerequisite_result_for_key(&self, key: &str) -> Option<DynValue> {
        self.keyed_prerequisites_snapshot()
            .into_iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, t)| t.result_value())
    }

    pub fn prerequisite_results_by_task(&self) -> Vec<(Task, Option<DynValue>)> {
        self.prerequisites_snapshot()
            .into_iter()
            .map(|p| {
                let r = p.result_value();
                (p, r)
            })
            .collect()
    }

    // ---- graph snapshots (pub(crate) wiring helpers) ------------------

    pub(crate) fn set_workflow(&self, workflow: Weak<WorkflowInner>) {
        *self.0.workflow.lock().unwrap() = Some(workflow);
    }

    pub(crate) fn add_unkeyed_prerequisite(&self, other: &Task) {
        self.0
            .edges
            .write()
            .unwrap()
            .unkeyed_prerequisites
            .push(Arc::downgrade(&other.0));
    }

    pub(crate) fn add_keyed_prerequisite(&self, key: &str, other: &Task) {
        self.0
            .edges
            .write()
            .unwrap()
            .keyed_prerequisites
            .insert(key.to_string(), Arc::downgrade(&other.0));
    }

    pub(crate) fn add_dependent(&self, other: &Task) {
        self.0
            .edges
            .write()
            .unwrap()
            .dependents
            .push(Arc::downgrade(&other.0));
    }

    pub(crate) fn finalize_initial_state(&self) {
        self.0.finalize_initial_state();
    }

    pub fn prerequisites_snapshot(&self) -> Vec<Task> {
        let edges = self.0.edges.read().unwrap();
        edges
            .unkeyed_prerequisites
            .iter()
            .chain(edges.keyed_prerequisites.values())
            .filter_map(Weak::upgrade)
            .map(Task)
            .collect()
    }

    pub fn unkeyed_prerequisites_snapshot(&self) -> Vec<Task> {
        let edges = self.0.edges.read().unwrap();
        edges
            .unkeyed_prerequisites
            .iter()
            .filter_map(Weak::upgrade)
            .map(Task)
            .collect()
    }

    pub fn keyed_prerequisites_snapshot(&self) -> Vec<(String, Task)> {
        let edges = self.0.edges.read().unwrap();
        edges
            .keyed_prerequisites
            .iter()
            .filter_map(|(k, w)| w.upgrade().map(|t| (k.clone(), Task(t))))
            .collect()
    }

    pub fn dependents_snapshot(&self) -> Vec<Task> {
        let edges = self.0.edges.read().unwrap();
        edges
            .dependents
            .iter()
            .filter_map(Weak::upgrade)
            .map(Task)
            .collect()
    }

    pub(crate) fn deps_satisfied(&self) -> bool {
        self.0.deps_satisfied()
    }

    fn post(&self, kind: EventKind) {
        if let Some(wf) = self.workflow() {
            wf.bus().post(Notification {
                subject: Subject::Task(self.id()),
                kind,
                task: None,
            });
        }
    }

    // ---- lifecycle -----------------------------------------------------

    /// If `Ready`, transition to `Executing` and dispatch the body to the
    /// owning workflow's pool (or run it synchronously if unattached).
    pub(crate) fn begin_if_ready(&self) {
        let became_executing = {
            let mut mutable = self.0.mutable.lock().unwrap();
            if mutable.state == TaskState::Ready {
                mutable.state = TaskState::Executing;
                true
            } else {
                false
            }
        };
        if !became_executing {
            return;
        }

        debug!(task = %self.name(), "task starting");
        if let Some(d) = self.delegate() {
            d.task_did_start(self);
        }
        self.post(EventKind::TaskDidStart);

        let task = self.clone();
        match self.workflow() {
            Some(workflow) => workflow.pool().enqueue(Box::new(move || task.run_body())),
            None => self.run_body(),
        }
    }

    fn run_body(&self) {
        let body = self.0.body.clone();
        body.run(self);
    }

    /// Attempt a `Pending -> Ready` transition. Returns `true` if the task is
    /// `Ready` as a result of this call (it may already have been).
    pub(crate) fn try_mark_ready(&self) -> bool {
        let mut mutable = self.0.mutable.lock().unwrap();
        if mutable.state == TaskState::Pending && self.0.deps_satisfied() {
            mutable.state = TaskState::Ready;
            true
        } else {
            mutable.state == TaskState::Ready
        }
    }

    /// Public entry point: attempt to begin executing this task.
    pub fn start(&self) {
        self.begin_if_ready();
    }

    pub fn finish(&self, result: DynValue) {
        let transitioned = {
            let mut mutable = self.0.mutable.lock().unwrap();
            if mutable.state == TaskState::Executing {
                mutable.state = TaskState::Finished;
                mutable.result = Some(result);
                mutable.error = None;
                mutable.finish_date = Some(Instant::now());
                true
            } else {
                false
            }
        };
        if !transitioned {
            warn!(task = %self.name(), "finish() called while not Executing; ignored");
            return;
        }
        debug!(task = %self.name(), "task finished");
        if let Some(d) = self.delegate() {
            d.task_did_finish(self);
        }
        self.post(EventKind::TaskDidFinish);
        if let Some(workflow) = self.workflow() {
            workflow.on_task_finished(self);
        }
    }

    pub fn fail(&self, error: DynError) {
        let transitioned = {
            let mut mutable = self.0.mutable.lock().unwrap();
            if mutable.state == TaskState::Executing {
                mutable.state = TaskState::Failed;
                mutable.error = Some(error);
                mutable.result = None;
                mutable.finish_date = Some(Instant::now());
                true
            } else {
                false
            }
        };
        if !transitioned {
            warn!(task = %self.name(), "fail() called while not Executing; ignored");
            return;
        }
        debug!(task = %self.name(), "task failed");
        if let Some(d) = self.delegate() {
            d.task_did_fail(self);
        }
        self.post(EventKind::TaskDidFail);
        if let Some(workflow) = self.workflow() {
            workflow.on_task_failed(self);
        }
    }

    /// Advisory cancellation: marks the task (and, transitively, its
    /// dependents) cancelled. Does not interrupt an in-flight body; bodies
    /// are expected to poll `is_executing()`/`is_cancelled()` cooperatively.
    pub fn cancel(&self) {
        let transitioned = {
            let mut mutable = self.0.mutable.lock().unwrap();
            if matches!(
                mutable.state,
                TaskState::Pending | TaskState::Ready | TaskState::Executing
            ) {
                mutable.state = TaskState::Cancelled;
                true
            } else {
                false
            }
        };
        if !transitioned {
            return;
        }
        debug!(task = %self.name(), "task cancelled");
        if let Some(d) = self.delegate() {
            d.task_did_cancel(self);
        }
        self.post(EventKind::TaskDidCancel);
        if let Some(workflow) = self.workflow() {
            workflow.on_task_cancelled(self);
        }
        for dependent in self.dependents_snapshot() {
            dependent.cancel();
        }
    }

    /// Clear result/error/finish-date and return to `Pending` (or `Ready` if
    /// the task has no prerequisites), propagating the same reset signal to
    /// every dependent. Does not stop an in-flight body.
    pub fn reset(&self) {
        let transitioned = {
            let mut mutable = self.0.mutable.lock().unwrap();
            if matches!(
                mutable.state,
                TaskState::Finished | TaskState::Failed | TaskState::Cancelled | TaskState::Executing
            ) {
                mutable.result = None;
                mutable.error = None;
                mutable.finish_date = None;
                mutable.state = if self.0.deps_satisfied() {
                    TaskState::Ready
                } else {
                    TaskState::Pending
                };
                true
            } else {
                false
            }
        };
        if transitioned {
            debug!(task = %self.name(), "task reset");
            if let Some(d) = self.delegate() {
                d.task_did_reset(self);
            }
            self.post(EventKind::TaskDidReset);
        }
        for dependent in self.dependents_snapshot() {
            dependent.reset();
        }
    }

    /// Re-attempt a `Cancelled`/`Failed` task: clears its error and returns
    /// to `Pending`/`Ready`, then (if now `Ready` and the workflow is
    /// active) immediately starts it. Propagates the retry signal to every
    /// dependent regardless of whether this task itself changed state.
    pub fn retry(&self) {
        let transitioned = {
            let mut mutable = self.0.mutable.lock().unwrap();
            if matches!(mutable.state, TaskState::Cancelled | TaskState::Failed) {
                mutable.error = None;
                mutable.state = if self.0.deps_satisfied() {
                    TaskState::Ready
                } else {
                    TaskState::Pending
                };
                true
            } else {
                false
            }
        };
        if transitioned {
            debug!(task = %self.name(), "task retried");
            if let Some(d) = self.delegate() {
                d.task_did_retry(self);
            }
            self.post(EventKind::TaskDidRetry);
            let should_start = self.workflow().map(|wf| wf.is_active()).unwrap_or(true)
                && self.state() == TaskState::Ready;
            if should_start {
                self.begin_if_ready();
            }
        }
        for dependent in self.dependents_snapshot() {
            dependent.retry();
        }
    }
}
