//! Cluster-state change notifications.

use std::sync::Arc;

use crate::ClusterState;

/// A change notification carrying the previous and current snapshots.
///
/// The convenience predicates compare the two snapshots structurally; most
/// consumers use them to decide cheaply whether a transition can possibly
/// matter to them before inspecting the snapshots themselves.
#[derive(Debug, Clone)]
pub struct ClusterChangedEvent {
    previous: Arc<ClusterState>,
    current: Arc<ClusterState>,
}

impl ClusterChangedEvent {
    /// Creates an event for the transition `previous -> current`.
    pub fn new(previous: Arc<ClusterState>, current: Arc<ClusterState>) -> Self {
        Self { previous, current }
    }

    /// The snapshot after the transition.
    pub fn state(&self) -> &Arc<ClusterState> {
        &self.current
    }

    /// The snapshot before the transition.
    pub fn previous_state(&self) -> &Arc<ClusterState> {
        &self.previous
    }

    /// Returns true if node membership differs between the snapshots.
    pub fn nodes_changed(&self) -> bool {
        self.previous.nodes() != self.current.nodes()
    }

    /// Returns true if at least one node present before is now gone.
    pub fn nodes_removed(&self) -> bool {
        self.previous
            .nodes()
            .iter()
            .any(|node| !self.current.nodes().node_exists(&node.id()))
    }

    /// Returns true if the shard routing table differs between the snapshots.
    pub fn routing_table_changed(&self) -> bool {
        self.previous.routing() != self.current.routing()
    }
}
