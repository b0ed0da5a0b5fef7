// src/lib.rs

//! A task-graph execution engine: declare a DAG of [`task::Task`]s joined by
//! prerequisite/dependent edges inside a [`workflow::Workflow`], then drive
//! the graph through its lifecycle while ready tasks run concurrently on a
//! [`pool::WorkerPool`].
//!
//! There is no CLI, wire protocol, or persisted file format here — this is a
//! library. See [`workflow::Workflow`] and [`task::Task`] for the primary
//! entry points.

pub mod delegate;
pub mod errors;
pub mod notify;
pub mod pool;
pub mod task;
pub mod types;
pub mod workflow;

pub use delegate::{TaskDelegate, WorkflowDelegate};
pub use errors::{Result, WorkflowError};
pub use pool::{TokioWorkerPool, WorkerPool};
pub use task::{ClosureTask, ConditionTask, SubworkflowTask, Task, TaskBody, TaskState};
pub use types::{DynError, DynValue, TaskId, WorkflowId};
pub use workflow::Workflow;
