// src/workflow/mod.rs

//! Workflows: a container of tasks plus the worker pool and notification
//! bus they share.
//!
//! [`Workflow`] strongly owns every [`Task`] added to it (`tasks: HashMap<TaskId,
//! Task>`); edges and the task-side back-reference to the workflow are weak,
//! per [`crate::task`]'s module doc.

pub mod graph;
pub mod lifecycle;

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, Weak};

use crate::delegate::WorkflowDelegate;
use crate::notify::NotificationCenter;
use crate::pool::{TokioWorkerPool, WorkerPool};
use crate::task::Task;
use crate::types::{TaskId, WorkflowId};

pub struct WorkflowInner {
    pub(crate) id: WorkflowId,
    pub(crate) name: String,
    pub(crate) tasks: Mutex<HashMap<TaskId, Task>>,
    pub(crate) pool: Arc<dyn WorkerPool>,
    pub(crate) bus: NotificationCenter,
    pub(crate) delegate: Mutex<Option<Arc<dyn WorkflowDelegate>>>,
    pub(crate) active: AtomicBool,
    pub(crate) finished_fired: AtomicBool,
    self_weak: Weak<WorkflowInner>,
}

/// A handle to a task graph and the resources (pool, notification bus) it
/// executes against.
#[derive(Clone)]
pub struct Workflow(pub(crate) Arc<WorkflowInner>);

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .finish()
    }
}

impl Workflow {
    /// A workflow with the default Tokio-backed worker pool.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_pool(name, Arc::new(TokioWorkerPool::with_default_concurrency()))
    }

    /// A workflow driven by a caller-supplied [`WorkerPool`] (tests typically
    /// pass a synchronous pool here).
    pub fn with_pool(name: impl Into<String>, pool: Arc<dyn WorkerPool>) -> Self {
        let name = name.into();
        let inner = Arc::new_cyclic(|weak| WorkflowInner {
            id: WorkflowId::next(),
            name,
            tasks: Mutex::new(HashMap::new()),
            pool,
            bus: NotificationCenter::new(),
            delegate: Mutex::new(None),
            active: AtomicBool::new(false),
            finished_fired: AtomicBool::new(false),
            self_weak: weak.clone(),
        });
        Workflow(inner)
    }

    pub(crate) fn from_inner(inner: Arc<WorkflowInner>) -> Self {
        Workflow(inner)
    }

    pub fn id(&self) -> WorkflowId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn set_delegate(&self, delegate: Arc<dyn WorkflowDelegate>) {
        *self.0.delegate.lock().unwrap() = Some(delegate);
    }

    pub fn bus(&self) -> &NotificationCenter {
        &self.0.bus
    }

    pub(crate) fn pool(&self) -> &Arc<dyn WorkerPool> {
        &self.0.pool
    }

    pub(crate) fn is_active(&self) -> bool {
        self.0.active.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn all_tasks(&self) -> Vec<Task> {
        self.0.tasks.lock().unwrap().values().cloned().collect()
    }

    pub fn has_unfinished_tasks(&self) -> bool {
        self.0
            .tasks
            .lock()
            .unwrap()
            .values()
            .any(|t| !t.state().is_terminal())
    }

    pub fn has_failed_tasks(&self) -> bool {
        self.0.tasks.lock().unwrap().values().any(|t| t.is_failed())
    }

    fn delegate(&self) -> Option<Arc<dyn WorkflowDelegate>> {
        self.0.delegate.lock().unwrap().clone()
    }

    pub(crate) fn self_weak(&self) -> Weak<WorkflowInner> {
        self.0.self_weak.clone()
    }
}
