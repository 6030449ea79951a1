//! Immutable cluster-state snapshots.

use std::collections::BTreeMap;

use roost_registry::TaskRegistry;
use serde::{Deserialize, Serialize};

use crate::{DiscoveryNodes, RoutingTable};

/// Cluster metadata: unrelated settings plus the extensible slot holding the
/// task registry.
///
/// A snapshot without a registry is treated as "no tasks" by every consumer,
/// never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    settings: BTreeMap<String, String>,
    tasks: Option<TaskRegistry>,
}

impl Metadata {
    /// The task registry, if one has been installed.
    pub fn task_registry(&self) -> Option<&TaskRegistry> {
        self.tasks.as_ref()
    }

    /// Looks up an unrelated metadata setting.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}

/// A point-in-time, immutable view of the cluster.
///
/// Snapshots are compared structurally. The `version` is assigned by the
/// [`ClusterService`](crate::ClusterService) single writer and increases by
/// one per committed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    version: u64,
    nodes: DiscoveryNodes,
    routing: RoutingTable,
    metadata: Metadata,
}

impl ClusterState {
    /// Starts a builder for an initial state.
    pub fn builder() -> ClusterStateBuilder {
        ClusterStateBuilder {
            version: 0,
            nodes: DiscoveryNodes::empty(),
            routing: RoutingTable::empty(),
            metadata: Metadata::default(),
        }
    }

    /// Starts a builder seeded with this state's contents.
    pub fn to_builder(&self) -> ClusterStateBuilder {
        ClusterStateBuilder {
            version: self.version,
            nodes: self.nodes.clone(),
            routing: self.routing.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// The version assigned when this state was committed.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Live node membership.
    pub fn nodes(&self) -> &DiscoveryNodes {
        &self.nodes
    }

    /// The shard routing table.
    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    /// Cluster metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Convenience accessor for the task registry slot.
    pub fn task_registry(&self) -> Option<&TaskRegistry> {
        self.metadata.task_registry()
    }

    /// Returns a state identical to this one with the given registry
    /// installed. Version is untouched; the single writer bumps it on commit.
    pub fn with_task_registry(&self, registry: TaskRegistry) -> Self {
        let mut next = self.clone();
        next.metadata.tasks = Some(registry);
        next
    }

    pub(crate) fn with_version(&self, version: u64) -> Self {
        let mut next = self.clone();
        next.version = version;
        next
    }
}

/// Builder for [`ClusterState`].
#[derive(Debug, Clone)]
pub struct ClusterStateBuilder {
    version: u64,
    nodes: DiscoveryNodes,
    routing: RoutingTable,
    metadata: Metadata,
}

impl ClusterStateBuilder {
    /// Replaces node membership.
    pub fn nodes(mut self, nodes: DiscoveryNodes) -> Self {
        self.nodes = nodes;
        self
    }

    /// Replaces the routing table.
    pub fn routing(mut self, routing: RoutingTable) -> Self {
        self.routing = routing;
        self
    }

    /// Installs a task registry in the metadata slot.
    pub fn task_registry(mut self, registry: TaskRegistry) -> Self {
        self.metadata.tasks = Some(registry);
        self
    }

    /// Clears the task registry slot.
    pub fn clear_task_registry(mut self) -> Self {
        self.metadata.tasks = None;
        self
    }

    /// Sets an unrelated metadata setting.
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.settings.insert(key.into(), value.into());
        self
    }

    /// Finalizes the state.
    pub fn build(self) -> ClusterState {
        ClusterState {
            version: self.version,
            nodes: self.nodes,
            routing: self.routing,
            metadata: self.metadata,
        }
    }
}
