//! Load-spreading placement by rendezvous hashing.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use roost_cluster::{ClusterState, NodeRole};
use roost_id::NodeId;
use roost_registry::Assignment;

use crate::PlacementPolicy;

/// Spreads tasks across live worker nodes by rendezvous (highest random
/// weight) hashing over the task params and each worker's ID.
///
/// The policy signature carries no task identity, so a load-counting policy
/// cannot tell "this task's own weight on its current node" apart from real
/// load and would migrate a settled task on every pass. Rendezvous hashing
/// sidesteps that: the winning worker is a pure function of params and the
/// live worker set, so a settled task re-evaluates to its current node and
/// the engine's equality check leaves it untouched. When a worker leaves,
/// only the tasks that scored highest on it move; everything else stays put.
pub struct BalancedPolicy;

impl BalancedPolicy {
    /// Explanation recorded on assignments made by this policy.
    pub const EXPLANATION: &'static str = "assigned to the highest scoring live worker node";

    fn score(params: &serde_json::Value, node: &NodeId) -> u64 {
        let mut hasher = DefaultHasher::new();
        // serde_json maps are sorted, so Display is deterministic
        params.to_string().hash(&mut hasher);
        node.hash(&mut hasher);
        hasher.finish()
    }
}

impl PlacementPolicy for BalancedPolicy {
    fn assignment(
        &self,
        _task_type: &str,
        state: &ClusterState,
        params: &serde_json::Value,
    ) -> Assignment {
        let chosen = state
            .nodes()
            .with_role(NodeRole::Worker)
            .map(|node| node.id())
            .max_by_key(|id| (Self::score(params, id), *id));
        match chosen {
            Some(node) => Assignment::to(node, Self::EXPLANATION),
            None => Assignment::no_node_found(),
        }
    }
}
