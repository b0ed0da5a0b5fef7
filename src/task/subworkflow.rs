// src/task/subworkflow.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::core::TaskBody;
use super::Task;
use crate::notify::{EventKind, Subject, Subscription};
use crate::types::value;
use crate::workflow::Workflow;

#[derive(Debug, thiserror::Error)]
#[error("a task in the inner workflow failed")]
struct SubworkflowTaskFailed;

/// A task that wraps an entire inner [`Workflow`].
///
/// `main` subscribes to the inner workflow's notifications, then starts it
/// (or, if the inner workflow is already in a terminal state, short-circuits
/// immediately). The outer task finishes with the inner workflow as its
/// result when the inner workflow finishes; fails with the first inner
/// failure's error; and cancels itself if the inner workflow is cancelled
/// before any failure has been observed.
pub struct SubworkflowTask {
    task: Task,
}

struct SubworkflowBody {
    inner: Workflow,
    settled: Arc<AtomicBool>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl TaskBody for SubworkflowBody {
    fn run(&self, task: &Task) {
        if let Some(error) = self.first_failure_error() {
            task.fail(error);
            return;
        }
        if !self.inner.has_unfinished_tasks() {
            task.finish(value(self.inner.clone()));
            return;
        }

        let mut subs = self.subscriptions.lock().unwrap();
        subs.push(self.subscribe_finish(task));
        subs.push(self.subscribe_failure(task));
        subs.push(self.subscribe_cancellation(task));
        drop(subs);

        self.inner.start();
    }
}

impl SubworkflowBody {
    fn first_failure_error(&self) -> Option<Arc<dyn std::error::Error + Send + Sync>> {
        self.inner
            .all_tasks()
            .into_iter()
            .filter(|t| t.is_failed())
            .min_by_key(|t| t.finish_date())
            .map(|t| t.error().unwrap_or_else(|| Arc::new(SubworkflowTaskFailed)))
    }

    fn subscribe_finish(&self, task: &Task) -> Subscription {
        let settled = self.settled.clone();
        let inner = self.inner.clone();
        let task = task.clone();
        self.inner.bus().subscribe(
            Subject::Workflow(self.inner.id()),
            EventKind::WorkflowDidFinish,
            move |_| {
                if settled.swap(true, Ordering::SeqCst) {
                    return;
                }
                task.finish(value(inner.clone()));
            },
        )
    }

    fn subscribe_failure(&self, task: &Task) -> Subscription {
        let settled = self.settled.clone();
        let inner = self.inner.clone();
        let task = task.clone();
        self.inner.bus().subscribe(
            Subject::Workflow(self.inner.id()),
            EventKind::WorkflowTaskDidFail,
            move |notification| {
                if settled.swap(true, Ordering::SeqCst) {
                    return;
                }
                let error = notification
                    .task
                    .and_then(|id| inner.all_tasks().into_iter().find(|t| t.id() == id))
                    .and_then(|t| t.error())
                    .unwrap_or_else(|| Arc::new(SubworkflowTaskFailed));
                task.fail(error);
            },
        )
    }

    fn subscribe_cancellation(&self, task: &Task) -> Subscription {
        let settled = self.settled.clone();
        let task = task.clone();
        self.inner.bus().subscribe(
            Subject::Workflow(self.inner.id()),
            EventKind::WorkflowTaskDidCancel,
            move |_| {
                if settled.swap(true, Ordering::SeqCst) {
                    return;
                }
                task.cancel();
            },
        )
    }
}

impl SubworkflowTask {
    pub fn new(name: impl Into<String>, inner: Workflow) -> Self {
        let body = Arc::new(SubworkflowBody {
            inner,
            settled: Arc::new(AtomicBool::new(false)),
            subscriptions: Mutex::new(Vec::new()),
        });
        let task = Task::with_body(name, std::collections::HashSet::new(), body);
        Self { task }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn into_task(self) -> Task {
        self.task
    }
}
