//! roost coordinator daemon
//!
//! Runs the persistent-task control loop against an in-process cluster-state
//! service, with a simulated set of worker nodes. Useful as a reference for
//! embedding the coordinator into a host system, and as a smoke harness:
//! it creates a handful of balanced tasks, logs every committed assignment
//! change, and re-homes tasks when a worker is removed.

mod config;

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::Result;
use roost_allocator::{BalancedPolicy, PolicyRegistry, TaskCoordinator};
use roost_cluster::{ClusterService, ClusterState, DiscoveryNode, DiscoveryNodes, NodeRole};
use roost_id::{NodeId, TaskId};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to ROOST_LOG_LEVEL)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting roost coordinator");
    info!(workers = config.workers, tasks = config.tasks, "Configuration loaded");

    // The in-process cluster: one controller node, workers join below
    let controller = DiscoveryNode::new(NodeId::new(), "controller-0", [NodeRole::Controller]);
    let mut nodes = DiscoveryNodes::builder();
    nodes.add(controller);
    let initial = ClusterState::builder().nodes(nodes.build()).build();
    let cluster = Arc::new(ClusterService::new(initial));

    let mut policies = PolicyRegistry::new();
    policies.register("balanced", Arc::new(BalancedPolicy))?;
    let coordinator = Arc::new(TaskCoordinator::new(cluster.clone(), Arc::new(policies)));

    // Create shutdown channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start the control loop in the background
    let loop_handle = tokio::spawn({
        let coordinator = coordinator.clone();
        async move {
            coordinator.run(shutdown_rx).await;
        }
    });

    // Log every committed assignment change
    let observer_handle = tokio::spawn({
        let mut states = cluster.subscribe();
        async move {
            while states.changed().await.is_ok() {
                let state = states.borrow_and_update().clone();
                let (assigned, unassigned) = state
                    .task_registry()
                    .map(|registry| {
                        let assigned = registry.iter().filter(|t| t.is_assigned()).count();
                        (assigned, registry.len() - assigned)
                    })
                    .unwrap_or((0, 0));
                info!(
                    version = state.version(),
                    nodes = state.nodes().len(),
                    assigned,
                    unassigned,
                    "Cluster state committed"
                );
            }
        }
    });

    // Simulate worker enrollment
    for i in 0..config.workers {
        let node = DiscoveryNode::worker(NodeId::new(), format!("worker-{i}"));
        cluster
            .submit_update::<_, Infallible>("node join", None, |state| {
                let mut nodes = state.nodes().to_builder();
                nodes.add(node);
                Ok(state.to_builder().nodes(nodes.build()).build())
            })
            .await?;
    }

    // Schedule the demo tasks
    for i in 0..config.tasks {
        let task = coordinator
            .create_task(
                TaskId::new(),
                "balanced",
                serde_json::json!({"job": format!("demo-{i}")}),
            )
            .await?;
        info!(task_id = %task.id(), assignment = %task.assignment(), "Created task");
    }

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    shutdown_tx.send(true)?;
    loop_handle.await?;
    observer_handle.abort();

    info!("Coordinator stopped");
    Ok(())
}
