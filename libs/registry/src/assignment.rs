//! Placement decisions for persistent tasks.

use roost_id::NodeId;
use serde::{Deserialize, Serialize};

/// The current placement decision for a task: a target node, or a reasoned
/// absence of one.
///
/// Equality is by `(node, explanation)`. The reassignment engine only replaces
/// a task's assignment when the newly computed one differs, which is what makes
/// a reassignment pass idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    node: Option<NodeId>,
    explanation: String,
}

impl Assignment {
    /// Explanation carried by the "no eligible node" sentinel.
    pub const NO_NODE_FOUND: &'static str = "no appropriate nodes found for the assignment";

    /// Explanation carried by a task that has never been through a
    /// reassignment pass.
    pub const WAITING: &'static str = "waiting for initial assignment";

    /// An assignment targeting a specific node.
    pub fn to(node: NodeId, explanation: impl Into<String>) -> Self {
        Self {
            node: Some(node),
            explanation: explanation.into(),
        }
    }

    /// An absent-node assignment with a policy-supplied explanation.
    pub fn none(explanation: impl Into<String>) -> Self {
        Self {
            node: None,
            explanation: explanation.into(),
        }
    }

    /// The sentinel returned by policies that found no eligible node.
    pub fn no_node_found() -> Self {
        Self::none(Self::NO_NODE_FOUND)
    }

    /// The assignment given to a freshly created task that has not been
    /// considered by its policy yet.
    pub fn initial() -> Self {
        Self::none(Self::WAITING)
    }

    /// The node this task should run on, if any.
    pub fn node(&self) -> Option<&NodeId> {
        self.node.as_ref()
    }

    /// The human-readable reason for this decision. Always present, including
    /// for absent-node assignments.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns true if a target node is present.
    pub fn is_assigned(&self) -> bool {
        self.node.is_some()
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node {
            Some(node) => write!(f, "{} ({})", node, self.explanation),
            None => write!(f, "unassigned ({})", self.explanation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_node_and_explanation() {
        let node = NodeId::new();
        assert_eq!(
            Assignment::to(node, "spread"),
            Assignment::to(node, "spread")
        );
        assert_ne!(
            Assignment::to(node, "spread"),
            Assignment::to(node, "rebalance")
        );
        assert_ne!(Assignment::to(node, "spread"), Assignment::none("spread"));
    }

    #[test]
    fn test_sentinel_is_unassigned() {
        let sentinel = Assignment::no_node_found();
        assert!(!sentinel.is_assigned());
        assert_eq!(sentinel.node(), None);
        assert_eq!(sentinel.explanation(), Assignment::NO_NODE_FOUND);
    }

    #[test]
    fn test_json_roundtrip() {
        let assignment = Assignment::to(NodeId::new(), "test assignment");
        let json = serde_json::to_string(&assignment).unwrap();
        let parsed: Assignment = serde_json::from_str(&json).unwrap();
        assert_eq!(assignment, parsed);
    }
}
