//! # roost-allocator
//!
//! The persistent-task reassignment core.
//!
//! Three pieces cooperate to keep every persistent task assigned to exactly
//! one live node as the cluster changes underneath it:
//!
//! - [`reassignment_required`] — pure predicate over a
//!   [`ClusterChangedEvent`](roost_cluster::ClusterChangedEvent) deciding
//!   whether a transition can alter any task's correct assignment. Most
//!   cluster churn (settings, unrelated metadata) is filtered out here.
//! - [`reassign_tasks`] — pure function folding a per-task-type
//!   [`PlacementPolicy`] over every task in registry order. The working
//!   snapshot is refreshed after each decision, so a policy enforcing a
//!   cross-task invariant sees the assignments already made earlier in the
//!   same pass.
//! - [`TaskCoordinator`] — the control loop gluing the two to the
//!   [`ClusterService`](roost_cluster::ClusterService) watch stream, and the
//!   surface callers use to create and remove tasks.
//!
//! # Invariants
//!
//! - Reassignment is deterministic and idempotent: re-running it on a state
//!   that already reflects its output changes nothing
//! - Every assigned node ID in a committed registry names a live node
//! - An unknown task type aborts the pass instead of silently dropping the
//!   task; the registry is retried unchanged on the next significant event

mod balanced;
mod coordinator;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
mod engine;
mod error;
mod policy;
mod significance;

pub use balanced::BalancedPolicy;
pub use coordinator::TaskCoordinator;
pub use engine::reassign_tasks;
pub use error::AllocationError;
pub use policy::{PlacementPolicy, PolicyRegistry};
pub use significance::reassignment_required;

/// Result type for allocation operations.
pub type AllocationResult<T> = Result<T, AllocationError>;
