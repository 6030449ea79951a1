//! The change significance filter.

use roost_cluster::ClusterChangedEvent;

use crate::engine::{needs_reassignment, validated};
use crate::PolicyRegistry;

/// Decides whether a cluster-state transition warrants a reassignment pass.
///
/// The test runs in two stages. First, a structural gate: membership changed,
/// the routing table changed, or the task registries of the two snapshots
/// differ (some other actor added, removed, or modified a task). When no
/// structural delta exists the event is insignificant no matter what else
/// moved — index settings and unrelated metadata churn stop here.
///
/// Second, relevance: the delta must be observable by at least one task. A
/// task observes it when it is unassigned or assigned to a departed node
/// *and* its policy would now hand it a different assignment than the one it
/// carries. A task whose policy keeps answering with the same sentinel is
/// permanently unassignable as far as this transition is concerned and does
/// not make the event significant.
///
/// A task type with no registered policy counts as significant so the engine
/// runs and surfaces the configuration error instead of it being masked here.
pub fn reassignment_required(event: &ClusterChangedEvent, policies: &PolicyRegistry) -> bool {
    let current = event.state();
    let Some(tasks) = current.task_registry() else {
        return false;
    };

    let registry_changed = event.previous_state().task_registry() != Some(tasks);
    if !(event.nodes_changed() || event.routing_table_changed() || registry_changed) {
        return false;
    }

    for task in tasks.iter() {
        if !needs_reassignment(task, current.nodes()) {
            continue;
        }
        let Ok(policy) = policies.resolve(task.task_type()) else {
            return true;
        };
        let proposed = validated(
            policy.assignment(task.task_type(), current, task.params()),
            current.nodes(),
        );
        if proposed != *task.assignment() {
            return true;
        }
    }

    false
}
