//! Placement policy trait and per-task-type dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use roost_cluster::ClusterState;
use roost_registry::Assignment;

use crate::{AllocationError, AllocationResult};

/// Per-task-type placement logic.
///
/// Invoked once per task per reassignment pass. The snapshot handed in
/// reflects every decision already made for tasks earlier in the pass's fixed
/// iteration order; no guarantee is made about tasks later in the order.
///
/// Implementations must be deterministic: the same snapshot and params must
/// always produce the same assignment, or the significance filter and the
/// engine will disagree about whether anything changed.
pub trait PlacementPolicy: Send + Sync {
    /// Decides where (if anywhere) a task of this type may run.
    ///
    /// Returning [`Assignment::no_node_found`] (or any absent-node
    /// assignment) leaves the task in the registry, unassigned, to be
    /// reconsidered on the next significant event.
    fn assignment(
        &self,
        task_type: &str,
        state: &ClusterState,
        params: &serde_json::Value,
    ) -> Assignment;
}

/// Registry mapping task-type names to their placement policies.
///
/// Resolution is by exact name. A miss is a configuration error surfaced as
/// [`AllocationError::UnknownTaskType`], never silently skipped.
#[derive(Default, Clone)]
pub struct PolicyRegistry {
    policies: BTreeMap<String, Arc<dyn PlacementPolicy>>,
}

impl PolicyRegistry {
    /// An empty policy registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a policy for a task type.
    ///
    /// Fails if the task type already has a policy.
    pub fn register(
        &mut self,
        task_type: impl Into<String>,
        policy: Arc<dyn PlacementPolicy>,
    ) -> AllocationResult<()> {
        let task_type = task_type.into();
        if self.policies.contains_key(&task_type) {
            return Err(AllocationError::DuplicatePolicy(task_type));
        }
        self.policies.insert(task_type, policy);
        Ok(())
    }

    /// Resolves the policy for a task type.
    pub fn resolve(&self, task_type: &str) -> AllocationResult<&Arc<dyn PlacementPolicy>> {
        self.policies
            .get(task_type)
            .ok_or_else(|| AllocationError::UnknownTaskType(task_type.to_string()))
    }

    /// Returns true if a policy is registered for this task type.
    pub fn contains(&self, task_type: &str) -> bool {
        self.policies.contains_key(task_type)
    }
}

impl std::fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("task_types", &self.policies.keys().collect::<Vec<_>>())
            .finish()
    }
}
