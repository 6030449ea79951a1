//! The reassignment engine.

use roost_cluster::{ClusterState, DiscoveryNodes};
use roost_registry::{Assignment, PersistentTask, TaskRegistry};
use tracing::{debug, warn};

use crate::{AllocationResult, PolicyRegistry};

/// Returns true if the task has no node or a node absent from the cluster.
pub(crate) fn needs_reassignment(task: &PersistentTask, nodes: &DiscoveryNodes) -> bool {
    match task.executor_node() {
        None => true,
        Some(node) => !nodes.node_exists(node),
    }
}

/// Clamps a policy's proposal to nodes that actually exist.
///
/// An assignment naming a node absent from the snapshot is never written
/// into the registry; it degrades to the no-node sentinel so that every
/// present node ID in a committed registry names a live node.
pub(crate) fn validated(proposed: Assignment, nodes: &DiscoveryNodes) -> Assignment {
    match proposed.node() {
        Some(node) if !nodes.node_exists(node) => {
            warn!(%node, "policy proposed a node absent from the snapshot");
            Assignment::no_node_found()
        }
        _ => proposed,
    }
}

/// Recomputes the assignment of every task in the snapshot's registry.
///
/// Tasks are visited in registry order (ascending task ID). For each task the
/// engine resolves the policy for its type, asks it for an assignment against
/// the *working* snapshot, and replaces the task's assignment only when the
/// proposal differs from what the task already carries. The working snapshot
/// is refreshed after every replacement, so policies see the decisions made
/// for earlier tasks in the same pass — this is what lets a policy enforce
/// "at most one assigned task of this type" correctly when several candidates
/// are reconsidered together.
///
/// Returns `None` when the snapshot carries no registry (nothing to do), and
/// the folded registry otherwise. An unresolvable task type aborts the whole
/// pass with an error; the caller retries on the next significant event.
pub fn reassign_tasks(
    state: &ClusterState,
    policies: &PolicyRegistry,
) -> AllocationResult<Option<TaskRegistry>> {
    let Some(registry) = state.task_registry() else {
        return Ok(None);
    };

    let task_ids: Vec<_> = registry.iter().map(|task| task.id()).collect();
    let mut working = registry.clone();
    let mut working_state = state.clone();

    for id in task_ids {
        let Some(task) = working.get(&id) else {
            continue;
        };
        let policy = policies.resolve(task.task_type())?;
        let proposed = policy.assignment(task.task_type(), &working_state, task.params());
        let proposed = validated(proposed, working_state.nodes());

        if proposed == *task.assignment() {
            continue;
        }

        debug!(task_id = %id, task_type = task.task_type(), assignment = %proposed, "Reassigning task");
        let mut builder = working.to_builder();
        builder.reassign_task(id, proposed)?;
        working = builder.build();
        working_state = working_state.with_task_registry(working.clone());
    }

    Ok(Some(working))
}
