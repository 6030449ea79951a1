//! Test policies and cluster-state fixtures shared across crates.
//!
//! The policies here are deliberately simple and deterministic so tests can
//! predict every assignment:
//!
//! - [`AlwaysAssignPolicy`] picks the first worker node in node-ID order
//! - [`NeverAssignPolicy`] always returns the no-node sentinel
//! - [`ExclusivePolicy`] allows at most one live assignment of its task type
//! - [`PinnedPolicy`] proposes a fixed node whether or not it is alive

use roost_cluster::{ClusterState, DiscoveryNode, DiscoveryNodes, NodeRole};
use roost_id::NodeId;
use roost_registry::Assignment;

use crate::PlacementPolicy;

/// Explanation used by test policies when they assign a node.
pub const TEST_ASSIGNMENT: &str = "test assignment";

/// Explanation used by [`ExclusivePolicy`] when the slot is taken.
pub const EXCLUSIVE_SLOT_TAKEN: &str = "only one task of this type may be assigned at a time";

fn first_worker(state: &ClusterState) -> Option<NodeId> {
    state
        .nodes()
        .with_role(NodeRole::Worker)
        .map(|node| node.id())
        .next()
}

/// Assigns every task to the first worker node, in node-ID order.
pub struct AlwaysAssignPolicy;

impl PlacementPolicy for AlwaysAssignPolicy {
    fn assignment(
        &self,
        _task_type: &str,
        state: &ClusterState,
        _params: &serde_json::Value,
    ) -> Assignment {
        match first_worker(state) {
            Some(node) => Assignment::to(node, TEST_ASSIGNMENT),
            None => Assignment::no_node_found(),
        }
    }
}

/// Declines every task with the no-node sentinel.
pub struct NeverAssignPolicy;

impl PlacementPolicy for NeverAssignPolicy {
    fn assignment(
        &self,
        _task_type: &str,
        _state: &ClusterState,
        _params: &serde_json::Value,
    ) -> Assignment {
        Assignment::no_node_found()
    }
}

/// Allows at most one assigned task of its type across the cluster.
///
/// The slot check runs against the snapshot the engine hands the policy,
/// which reflects assignments already made earlier in the same pass. The
/// policy signature carries no task identity, so the current slot holder is
/// recognized by its params: a live holder whose params match the evaluated
/// task is the task itself and keeps its assignment. Tasks of this type must
/// therefore carry distinct params.
pub struct ExclusivePolicy;

impl PlacementPolicy for ExclusivePolicy {
    fn assignment(
        &self,
        task_type: &str,
        state: &ClusterState,
        params: &serde_json::Value,
    ) -> Assignment {
        let holder = state.task_registry().and_then(|registry| {
            registry
                .find_tasks(task_type, |task| {
                    task.executor_node()
                        .is_some_and(|node| state.nodes().node_exists(node))
                })
                .next()
        });
        if let Some(holder) = holder {
            if holder.params() == params {
                return holder.assignment().clone();
            }
            return Assignment::none(EXCLUSIVE_SLOT_TAKEN);
        }
        match first_worker(state) {
            Some(node) => Assignment::to(node, TEST_ASSIGNMENT),
            None => Assignment::no_node_found(),
        }
    }
}

/// Proposes a fixed node regardless of cluster membership.
///
/// Used to exercise the engine's handling of policies that name a node absent
/// from the snapshot.
pub struct PinnedPolicy(pub NodeId);

impl PlacementPolicy for PinnedPolicy {
    fn assignment(
        &self,
        _task_type: &str,
        _state: &ClusterState,
        _params: &serde_json::Value,
    ) -> Assignment {
        Assignment::to(self.0, TEST_ASSIGNMENT)
    }
}

/// Builds a node set of `count` worker nodes, returning their IDs in
/// ascending order (the order policies visit them in).
pub fn worker_nodes(count: usize) -> (DiscoveryNodes, Vec<NodeId>) {
    let mut builder = DiscoveryNodes::builder();
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let id = NodeId::new();
        builder.add(DiscoveryNode::worker(id, format!("worker-{i}")));
        ids.push(id);
    }
    ids.sort();
    (builder.build(), ids)
}

/// Empty task params for tests that do not care about the payload.
pub fn no_params() -> serde_json::Value {
    serde_json::json!({})
}
