//! The task coordinator control loop.

use std::sync::Arc;

use roost_cluster::{ClusterChangedEvent, ClusterService, ClusterState, Published};
use roost_id::TaskId;
use roost_registry::{PersistentTask, TaskRegistry};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::engine::validated;
use crate::{reassign_tasks, reassignment_required, AllocationError, AllocationResult, PolicyRegistry};

/// Glue between the cluster-state stream and the pure reassignment functions.
///
/// The coordinator subscribes to committed snapshots, forms
/// `(previous, current)` change events, and runs a reassignment pass whenever
/// the significance filter says the transition matters. Its submissions are
/// CAS'd on the version it observed; a superseded submission is dropped and
/// the superseding state re-evaluated on the next notification. Because the
/// engine is idempotent, no further conflict handling is needed.
///
/// It also carries the producer surface: [`create_task`](Self::create_task)
/// and [`remove_task`](Self::remove_task) are ordinary cluster-state
/// submissions, picked up as registry deltas by the filter on every node
/// observing the stream.
pub struct TaskCoordinator {
    cluster: Arc<ClusterService>,
    policies: Arc<PolicyRegistry>,
}

impl TaskCoordinator {
    /// Creates a coordinator over the given cluster service and policies.
    pub fn new(cluster: Arc<ClusterService>, policies: Arc<PolicyRegistry>) -> Self {
        Self { cluster, policies }
    }

    /// Runs the control loop until shutdown is signaled.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut states = self.cluster.subscribe();
        let mut previous = states.borrow_and_update().clone();
        info!(version = previous.version(), "Starting task coordinator");

        // catch up on anything committed before this loop subscribed
        self.run_reassignment(&previous).await;

        loop {
            tokio::select! {
                changed = states.changed() => {
                    if changed.is_err() {
                        // cluster service dropped; nothing left to coordinate
                        break;
                    }
                    let current = states.borrow_and_update().clone();
                    let event = ClusterChangedEvent::new(previous.clone(), current.clone());
                    if reassignment_required(&event, &self.policies) {
                        self.run_reassignment(&current).await;
                    }
                    previous = current;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Task coordinator shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Submits a reassignment pass CAS'd on the observed snapshot version.
    async fn run_reassignment(&self, observed: &Arc<ClusterState>) {
        let outcome = self
            .cluster
            .submit_update::<_, AllocationError>(
                "reassign persistent tasks",
                Some(observed.version()),
                |state| match reassign_tasks(state, &self.policies)? {
                    Some(registry) => Ok(state.with_task_registry(registry)),
                    None => Ok(state.clone()),
                },
            )
            .await;

        match outcome {
            Ok(Published::Committed(state)) => {
                info!(version = state.version(), "Reassigned persistent tasks");
            }
            Ok(Published::Unchanged(_)) => {
                debug!("Reassignment pass produced no changes");
            }
            Ok(Published::Superseded { expected, actual }) => {
                debug!(expected, actual, "Reassignment superseded; re-evaluating on next event");
            }
            Err(error) => {
                // retried on the next significant event; registry untouched
                warn!(%error, "Persistent task reassignment failed");
            }
        }
    }

    /// Schedules a new persistent task.
    ///
    /// The task type must have a registered policy; the policy computes the
    /// initial assignment against the head snapshot. Fails on duplicate IDs.
    #[instrument(skip_all, fields(task_id = %id, task_type))]
    pub async fn create_task(
        &self,
        id: TaskId,
        task_type: &str,
        params: serde_json::Value,
    ) -> AllocationResult<PersistentTask> {
        let policy = self.policies.resolve(task_type)?.clone();

        let outcome = self
            .cluster
            .submit_update("create persistent task", None, move |state| {
                let registry = state.task_registry().cloned().unwrap_or_default();
                let initial = validated(
                    policy.assignment(task_type, state, &params),
                    state.nodes(),
                );
                let mut builder = registry.to_builder();
                builder.add_task(id, task_type, params, initial)?;
                Ok::<_, AllocationError>(state.with_task_registry(builder.build()))
            })
            .await?;

        let state = match outcome {
            Published::Committed(state) | Published::Unchanged(state) => state,
            Published::Superseded { .. } => {
                unreachable!("submissions without an expected version are never superseded")
            }
        };
        state
            .task_registry()
            .and_then(|registry| registry.get(&id))
            .cloned()
            .ok_or(AllocationError::TaskLost(id))
    }

    /// Removes a persistent task (completion, cancellation, or cleanup).
    ///
    /// Fails if no task with this ID exists.
    #[instrument(skip_all, fields(task_id = %id))]
    pub async fn remove_task(&self, id: TaskId) -> AllocationResult<()> {
        self.cluster
            .submit_update("remove persistent task", None, move |state| {
                let registry = state.task_registry().cloned().unwrap_or_default();
                let mut builder = registry.to_builder();
                builder.remove_task(id)?;
                Ok::<_, AllocationError>(state.with_task_registry(builder.build()))
            })
            .await?;
        Ok(())
    }

    /// The registry in the head snapshot, or an empty one.
    pub async fn current_tasks(&self) -> TaskRegistry {
        self.cluster
            .current()
            .await
            .task_registry()
            .cloned()
            .unwrap_or_default()
    }
}
