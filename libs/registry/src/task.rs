//! Persistent task records.

use roost_id::{NodeId, TaskId};
use serde::{Deserialize, Serialize};

use crate::Assignment;

/// A single persistent task tracked by the control plane.
///
/// `id`, `task_type`, and `params` are immutable for the task's lifetime. The
/// assignment is the only mutable field and is replaced wholesale by the
/// reassignment engine; each replacement bumps `allocation_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentTask {
    id: TaskId,
    task_type: String,
    params: serde_json::Value,
    allocation_id: u64,
    assignment: Assignment,
}

impl PersistentTask {
    pub(crate) fn new(
        id: TaskId,
        task_type: String,
        params: serde_json::Value,
        allocation_id: u64,
        assignment: Assignment,
    ) -> Self {
        Self {
            id,
            task_type,
            params,
            allocation_id,
            assignment,
        }
    }

    /// The globally unique task ID, fixed at creation time.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The task type, which selects the placement policy for this task.
    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// The opaque, task-type-specific payload.
    pub fn params(&self) -> &serde_json::Value {
        &self.params
    }

    /// Monotonic fencing token, bumped on every assignment replacement.
    pub fn allocation_id(&self) -> u64 {
        self.allocation_id
    }

    /// The current placement decision.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// The node this task is assigned to run on, if any.
    pub fn executor_node(&self) -> Option<&NodeId> {
        self.assignment.node()
    }

    /// Returns true if the task currently targets a node.
    pub fn is_assigned(&self) -> bool {
        self.assignment.is_assigned()
    }

    pub(crate) fn with_assignment(&self, allocation_id: u64, assignment: Assignment) -> Self {
        Self {
            id: self.id,
            task_type: self.task_type.clone(),
            params: self.params.clone(),
            allocation_id,
            assignment,
        }
    }
}
