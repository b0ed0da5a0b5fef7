// src/task/condition.rs

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::core::TaskBody;
use super::state::TaskState;
use super::Task;
use crate::types::{value, DynValue};

#[derive(Debug, Error)]
#[error("condition not yet fulfilled")]
struct NotFulfilled;

struct ConditionBody {
    state: Mutex<ConditionState>,
}

struct ConditionState {
    fulfilled: bool,
    result: Option<DynValue>,
}

impl TaskBody for ConditionBody {
    fn run(&self, task: &Task) {
        let state = self.state.lock().unwrap();
        if state.fulfilled {
            let result = state.result.clone().unwrap_or_else(|| value(()));
            drop(state);
            task.finish(result);
        } else {
            drop(state);
            task.fail(Arc::new(NotFulfilled));
        }
    }
}

/// A task that fails until externally `fulfill`-ed, at which point it
/// finishes with the supplied result.
///
/// `main` always runs first and observes the flag *at the time it runs*:
/// unfulfilled, it fails with a synthetic error; fulfilled, it finishes with
/// the stored result. `fulfill` sets the flag and result, then re-drives the
/// state machine (`retry` from `Cancelled`/`Failed`, `start` from `Ready`),
/// which causes `main` to run again and this time observe the flag set.
pub struct ConditionTask {
    task: Task,
    body: Arc<ConditionBody>,
}

impl ConditionTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_required_keys(name, HashSet::new())
    }

    pub fn with_required_keys(
        name: impl Into<String>,
        required_prerequisite_keys: HashSet<String>,
    ) -> Self {
        let body = Arc::new(ConditionBody {
            state: Mutex::new(ConditionState {
                fulfilled: false,
                result: None,
            }),
        });
        let task = Task::with_body(name, required_prerequisite_keys, body.clone());
        Self { task, body }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn into_task(self) -> Task {
        self.task
    }

    pub fn is_fulfilled(&self) -> bool {
        self.body.state.lock().unwrap().fulfilled
    }

    /// Mark the condition fulfilled and re-drive the state machine so the
    /// task (re-)runs its body and observes the new state.
    pub fn fulfill(&self, result: DynValue) {
        {
            let mut state = self.body.state.lock().unwrap();
            state.fulfilled = true;
            state.result = Some(result);
        }
        match self.task.state() {
            TaskState::Cancelled | TaskState::Failed => self.task.retry(),
            TaskState::Ready => self.task.start(),
            _ => {}
        }
    }
}
