// src/task/core.rs

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Instant;

use tracing::debug;

use crate::task::state::TaskState;
use crate::types::{DynError, DynValue, TaskId};
use crate::workflow::WorkflowInner;

/// The capability a task variant provides: run, and eventually call
/// `finish`/`fail` on the `task` handle passed in. Closure-task, condition-
/// task and sub-workflow task are three tagged implementations of this
/// trait rather than a subclass hierarchy.
pub trait TaskBody: Send + Sync {
    fn run(&self, task: &super::Task);
}

pub(crate) struct MutableState {
    pub state: TaskState,
    pub result: Option<DynValue>,
    pub error: Option<DynError>,
    pub finish_date: Option<Instant>,
}

impl Default for MutableState {
    fn default() -> Self {
        Self {
            state: TaskState::Pending,
            result: None,
            error: None,
            finish_date: None,
        }
    }
}

#[derive(Default)]
pub(crate) struct Edges {
    pub unkeyed_prerequisites: Vec<Weak<TaskInner>>,
    pub keyed_prerequisites: HashMap<String, Weak<TaskInner>>,
    pub dependents: Vec<Weak<TaskInner>>,
}

pub struct TaskInner {
    pub(crate) id: TaskId,
    pub(crate) name: String,
    pub(crate) mutable: Mutex<MutableState>,
    pub(crate) edges: RwLock<Edges>,
    pub(crate) required_prerequisite_keys: HashSet<String>,
    pub(crate) workflow: Mutex<Option<Weak<WorkflowInner>>>,
    pub(crate) delegate: Mutex<Option<Arc<dyn crate::delegate::TaskDelegate>>>,
    pub(crate) body: Arc<dyn TaskBody>,
}

impl TaskInner {
    pub(crate) fn new(
        name: impl Into<String>,
        required_prerequisite_keys: HashSet<String>,
        body: Arc<dyn TaskBody>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: TaskId::next(),
            name: name.into(),
            mutable: Mutex::new(MutableState::default()),
            edges: RwLock::new(Edges::default()),
            required_prerequisite_keys,
            workflow: Mutex::new(None),
            delegate: Mutex::new(None),
            body,
        })
    }

    /// Called once, while the owning workflow's graph lock is held, right
    /// after edges are wired: a task starts Ready if it has no
    /// prerequisites, Pending otherwise.
    pub(crate) fn finalize_initial_state(&self) {
        let has_prereqs = {
            let edges = self.edges.read().unwrap();
            !edges.unkeyed_prerequisites.is_empty() || !edges.keyed_prerequisites.is_empty()
        };
        let mut mutable = self.mutable.lock().unwrap();
        mutable.state = if has_prereqs {
            TaskState::Pending
        } else {
            TaskState::Ready
        };
        debug!(task = %self.name, state = ?mutable.state, "initial state assigned");
    }

    pub(crate) fn deps_satisfied(&self) -> bool {
        let edges = self.edges.read().unwrap();
        edges
            .unkeyed_prerequisites
            .iter()
            .chain(edges.keyed_prerequisites.values())
            .all(|weak| {
                weak.upgrade()
                    .map(|p| p.mutable.lock().unwrap().state == TaskState::Finished)
                    .unwrap_or(false)
            })
    }
}
