// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! [`WorkflowError`] covers programming errors: misuse of the graph-building
//! API. It is distinct from a user-task failure, which is an opaque
//! [`crate::types::DynError`] carried on the failing [`crate::task::Task`]
//! itself rather than returned from a crate operation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("task '{0}' is already a member of a workflow")]
    TaskAlreadyInWorkflow(String),

    #[error("prerequisite '{0}' is not a member of this workflow")]
    PrerequisiteNotInWorkflow(String),

    #[error("task '{0}' requires prerequisite keys {1:?} which were not all provided")]
    MissingRequiredPrerequisiteKeys(String, Vec<String>),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
