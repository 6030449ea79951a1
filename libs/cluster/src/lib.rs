//! # roost-cluster
//!
//! Cluster-state snapshots and the state publication service.
//!
//! ## Design Principles
//!
//! - A cluster state is a point-in-time, immutable value: node membership,
//!   the shard routing table, and a metadata section holding the task registry
//! - States are compared structurally, never by reference; two snapshots that
//!   describe the same cluster are equal
//! - All mutations flow through a single writer ([`ClusterService`]) that
//!   versions each committed state and publishes it on a watch channel
//! - A submission carrying a stale expected version resolves to
//!   [`Published::Superseded`] and is dropped; the submitter re-evaluates
//!   against the superseding state on its next change notification
//!
//! This crate is an in-memory stand-in for a replicated cluster-state store.
//! Persistence, replication, and transport are deliberately out of scope.

mod event;
mod node;
mod routing;
mod service;
mod state;

pub use event::ClusterChangedEvent;
pub use node::{DiscoveryNode, DiscoveryNodes, DiscoveryNodesBuilder, NodeRole};
pub use routing::{IndexRouting, RoutingTable};
pub use service::{ClusterService, Published};
pub use state::{ClusterState, ClusterStateBuilder, Metadata};
