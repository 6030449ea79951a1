//! Error types for allocation and coordination.

use roost_id::TaskId;
use roost_registry::RegistryError;
use thiserror::Error;

/// Errors that can occur while computing or applying assignments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// No placement policy is registered for this task type.
    ///
    /// This is a configuration error: the registry holds a task nobody can
    /// place. The reassignment pass it aborts is retried on the next
    /// significant event.
    #[error("no placement policy registered for task type '{0}'")]
    UnknownTaskType(String),

    /// A policy for this task type is already registered.
    #[error("placement policy for task type '{0}' already registered")]
    DuplicatePolicy(String),

    /// A registry mutation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A committed state no longer contains the task it was expected to.
    #[error("task {0} missing from committed state")]
    TaskLost(TaskId),
}
