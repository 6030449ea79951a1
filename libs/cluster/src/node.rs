//! Node membership types.

use std::collections::{BTreeMap, BTreeSet};

use roost_id::NodeId;
use serde::{Deserialize, Serialize};

/// Role a node plays in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// Runs the control loop and publishes cluster state.
    Controller,

    /// Eligible to execute persistent tasks.
    Worker,
}

/// A single live node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryNode {
    id: NodeId,
    name: String,
    roles: BTreeSet<NodeRole>,
}

impl DiscoveryNode {
    /// Creates a node with the given roles.
    pub fn new(id: NodeId, name: impl Into<String>, roles: impl IntoIterator<Item = NodeRole>) -> Self {
        Self {
            id,
            name: name.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Creates a worker node, the common case in tests and simulations.
    pub fn worker(id: NodeId, name: impl Into<String>) -> Self {
        Self::new(id, name, [NodeRole::Worker])
    }

    /// The node's stable identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the node carries the given role.
    pub fn has_role(&self, role: NodeRole) -> bool {
        self.roles.contains(&role)
    }
}

/// The set of live nodes, keyed by node ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryNodes {
    nodes: BTreeMap<NodeId, DiscoveryNode>,
}

impl DiscoveryNodes {
    /// An empty node set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a builder seeded with this node set.
    pub fn to_builder(&self) -> DiscoveryNodesBuilder {
        DiscoveryNodesBuilder {
            nodes: self.nodes.clone(),
        }
    }

    /// Starts a builder for a node set built from scratch.
    pub fn builder() -> DiscoveryNodesBuilder {
        DiscoveryNodesBuilder {
            nodes: BTreeMap::new(),
        }
    }

    /// Returns true if a node with this ID is in the cluster.
    pub fn node_exists(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Looks up a node by ID.
    pub fn get(&self, id: &NodeId) -> Option<&DiscoveryNode> {
        self.nodes.get(id)
    }

    /// Iterates nodes in ascending node-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &DiscoveryNode> {
        self.nodes.values()
    }

    /// Nodes carrying the given role, in ascending node-ID order.
    pub fn with_role(&self, role: NodeRole) -> impl Iterator<Item = &DiscoveryNode> {
        self.nodes.values().filter(move |n| n.has_role(role))
    }

    /// Number of nodes in the cluster.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes are known.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builder for [`DiscoveryNodes`].
#[derive(Debug, Clone)]
pub struct DiscoveryNodesBuilder {
    nodes: BTreeMap<NodeId, DiscoveryNode>,
}

impl DiscoveryNodesBuilder {
    /// Adds (or replaces) a node.
    pub fn add(&mut self, node: DiscoveryNode) -> &mut Self {
        self.nodes.insert(node.id(), node);
        self
    }

    /// Removes a node by ID. Removing an unknown node is a no-op.
    pub fn remove(&mut self, id: &NodeId) -> &mut Self {
        self.nodes.remove(id);
        self
    }

    /// Finalizes the node set.
    pub fn build(&self) -> DiscoveryNodes {
        DiscoveryNodes {
            nodes: self.nodes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_add_remove() {
        let id = NodeId::new();
        let mut builder = DiscoveryNodes::builder();
        builder.add(DiscoveryNode::worker(id, "w0"));
        let nodes = builder.build();
        assert!(nodes.node_exists(&id));

        let mut builder = nodes.to_builder();
        builder.remove(&id);
        let updated = builder.build();
        assert!(!updated.node_exists(&id));
        // the original set is untouched
        assert!(nodes.node_exists(&id));
    }

    #[test]
    fn test_with_role_filters() {
        let worker = NodeId::new();
        let controller = NodeId::new();
        let mut builder = DiscoveryNodes::builder();
        builder.add(DiscoveryNode::worker(worker, "w0"));
        builder.add(DiscoveryNode::new(controller, "c0", [NodeRole::Controller]));
        let nodes = builder.build();

        let workers: Vec<NodeId> = nodes.with_role(NodeRole::Worker).map(|n| n.id()).collect();
        assert_eq!(workers, vec![worker]);
    }

    #[test]
    fn test_structural_equality() {
        let id = NodeId::new();
        let mut a = DiscoveryNodes::builder();
        a.add(DiscoveryNode::worker(id, "w0"));
        let mut b = DiscoveryNodes::builder();
        b.add(DiscoveryNode::worker(id, "w0"));
        assert_eq!(a.build(), b.build());
    }
}
