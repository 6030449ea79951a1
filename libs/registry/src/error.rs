//! Error types for registry mutations.

use roost_id::TaskId;
use thiserror::Error;

/// Errors that can occur when mutating the task registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A task with this ID already exists in the registry.
    #[error("task already exists: {0}")]
    DuplicateTask(TaskId),

    /// No task with this ID exists in the registry.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),
}
