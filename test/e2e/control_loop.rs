//! End-to-end control loop test.
//!
//! This test validates the complete task lifecycle against a running
//! coordinator, verifying:
//!
//! 1. Tasks created before any worker exists stay parked, unassigned
//! 2. A joining worker picks up the parked task
//! 3. New tasks spread across workers under the balanced policy
//! 4. Losing a worker re-homes its tasks to the survivor
//! 5. Unrelated metadata churn leaves the registry untouched
//! 6. Removed tasks disappear from the registry
//!
//! ## Running
//!
//! ```bash
//! cargo test -p roost-e2e --test control_loop
//! ```

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use roost_allocator::{BalancedPolicy, PolicyRegistry, TaskCoordinator};
use roost_cluster::{ClusterService, ClusterState, DiscoveryNode, DiscoveryNodes, NodeRole};
use roost_id::{NodeId, TaskId};
use roost_registry::Assignment;
use tokio::sync::watch;

async fn wait_for<F>(cluster: &ClusterService, what: &str, predicate: F)
where
    F: Fn(&ClusterState) -> bool,
{
    let max_wait = Duration::from_secs(10);
    let start = std::time::Instant::now();

    loop {
        let state = cluster.current().await;
        if predicate(&state) {
            return;
        }
        if start.elapsed() > max_wait {
            panic!("timed out waiting for {what}; head version {}", state.version());
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

async fn join_worker(cluster: &ClusterService, name: &str) -> NodeId {
    let id = NodeId::new();
    cluster
        .submit_update::<_, Infallible>("node join", None, |state| {
            let mut nodes = state.nodes().to_builder();
            nodes.add(DiscoveryNode::worker(id, name));
            Ok(state.to_builder().nodes(nodes.build()).build())
        })
        .await
        .unwrap();
    id
}

async fn leave_worker(cluster: &ClusterService, id: NodeId) {
    cluster
        .submit_update::<_, Infallible>("node leave", None, |state| {
            let mut nodes = state.nodes().to_builder();
            nodes.remove(&id);
            Ok(state.to_builder().nodes(nodes.build()).build())
        })
        .await
        .unwrap();
}

fn assigned_to(state: &ClusterState, task: &TaskId, node: &NodeId) -> bool {
    state
        .task_registry()
        .and_then(|r| r.get(task))
        .map(|t| t.executor_node() == Some(node))
        .unwrap_or(false)
}

/// E2E control loop test covering the complete task lifecycle.
#[tokio::test]
async fn e2e_task_lifecycle_under_membership_churn() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roost_allocator=debug".into()),
        )
        .with_test_writer()
        .try_init();

    // In-process cluster: one controller, workers join below.
    let controller = DiscoveryNode::new(NodeId::new(), "controller-0", [NodeRole::Controller]);
    let mut nodes = DiscoveryNodes::builder();
    nodes.add(controller);
    let initial = ClusterState::builder().nodes(nodes.build()).build();
    let cluster = Arc::new(ClusterService::new(initial));

    let mut policies = PolicyRegistry::new();
    policies.register("balanced", Arc::new(BalancedPolicy)).unwrap();
    let policies = Arc::new(policies);
    let coordinator = TaskCoordinator::new(cluster.clone(), policies.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_handle = tokio::spawn({
        let cluster = cluster.clone();
        async move {
            TaskCoordinator::new(cluster, policies).run(shutdown_rx).await;
        }
    });

    // ===========================================================================
    // Step 1: Create a task before any worker exists
    // ===========================================================================
    let parked = coordinator
        .create_task(TaskId::new(), "balanced", serde_json::json!({"job": "parked"}))
        .await
        .unwrap();
    assert!(!parked.is_assigned(), "no worker yet, task must park");
    assert_eq!(parked.assignment().explanation(), Assignment::NO_NODE_FOUND);
    let parked_id = parked.id();

    // ===========================================================================
    // Step 2: First worker joins and picks up the parked task
    // ===========================================================================
    let w0 = join_worker(&cluster, "worker-0").await;
    wait_for(&cluster, "parked task to land on worker-0", |state| {
        assigned_to(state, &parked_id, &w0)
    })
    .await;

    // ===========================================================================
    // Step 3: Second worker joins; new tasks land on live workers
    // ===========================================================================
    let w1 = join_worker(&cluster, "worker-1").await;

    let mut task_ids = vec![parked_id];
    for i in 0..3 {
        let task = coordinator
            .create_task(
                TaskId::new(),
                "balanced",
                serde_json::json!({"job": format!("batch-{i}")}),
            )
            .await
            .unwrap();
        task_ids.push(task.id());
    }

    wait_for(&cluster, "all four tasks to be assigned", |state| {
        state
            .task_registry()
            .map(|r| r.iter().filter(|t| t.is_assigned()).count() == 4)
            .unwrap_or(false)
    })
    .await;

    let registry = coordinator.current_tasks().await;
    for task in registry.iter() {
        let home = task.executor_node().unwrap();
        assert!(home == &w0 || home == &w1, "tasks must live on live workers");
    }

    // ===========================================================================
    // Step 4: Worker-0 leaves; its tasks re-home to worker-1
    // ===========================================================================
    leave_worker(&cluster, w0).await;
    wait_for(&cluster, "all tasks to re-home to worker-1", |state| {
        state
            .task_registry()
            .map(|r| {
                r.len() == 4 && r.iter().all(|t| t.executor_node() == Some(&w1))
            })
            .unwrap_or(false)
    })
    .await;

    // ===========================================================================
    // Step 5: Unrelated metadata churn does not touch the registry
    // ===========================================================================
    let before = cluster.current().await;
    cluster
        .submit_update::<_, Infallible>("settings change", None, |state| {
            Ok(state.to_builder().setting("cluster.name", "e2e").build())
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let after = cluster.current().await;
    assert_eq!(
        after.version(),
        before.version() + 1,
        "only the settings commit should have landed"
    );
    assert_eq!(
        after.task_registry(),
        before.task_registry(),
        "registry must be untouched by unrelated churn"
    );

    // ===========================================================================
    // Step 6: Remove every task
    // ===========================================================================
    for id in &task_ids {
        coordinator.remove_task(*id).await.unwrap();
    }
    let registry = coordinator.current_tasks().await;
    assert!(registry.is_empty(), "all tasks removed");

    // ===========================================================================
    // Cleanup
    // ===========================================================================
    shutdown_tx.send(true).unwrap();
    loop_handle.await.unwrap();

    println!("E2E control loop test completed successfully!");
    println!("  Workers: {} then {}", w0, w1);
    println!("  Tasks scheduled: {}", task_ids.len());
    println!("  Final head version: {}", after.version());
}
