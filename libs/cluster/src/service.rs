//! Single-writer cluster-state publication.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, instrument};

use crate::ClusterState;

/// Outcome of a state submission.
#[derive(Debug, Clone)]
pub enum Published {
    /// The proposed state was committed and published with a fresh version.
    Committed(Arc<ClusterState>),

    /// The update produced a state structurally equal to the head; nothing
    /// was published.
    Unchanged(Arc<ClusterState>),

    /// The head moved past the submitter's expected version before the
    /// update ran. The submission is dropped; the submitter re-evaluates from
    /// the superseding state on its next change notification.
    Superseded { expected: u64, actual: u64 },
}

impl Published {
    /// Returns true for the committed outcome.
    pub fn is_committed(&self) -> bool {
        matches!(self, Published::Committed(_))
    }
}

/// The authoritative cluster-state holder.
///
/// All snapshot transitions go through [`submit_update`](Self::submit_update):
/// a fallible closure applied to the head state under the writer lock.
/// Committed states get `head.version + 1` and are broadcast to every
/// [`subscribe`](Self::subscribe)d watcher. This mirrors the compare-and-swap
/// update queue a replicated store would provide.
pub struct ClusterService {
    head: Mutex<Arc<ClusterState>>,
    tx: watch::Sender<Arc<ClusterState>>,
}

impl ClusterService {
    /// Creates a service holding the given initial state.
    pub fn new(initial: ClusterState) -> Self {
        let initial = Arc::new(initial);
        let (tx, _) = watch::channel(initial.clone());
        Self {
            head: Mutex::new(initial),
            tx,
        }
    }

    /// The current head snapshot.
    pub async fn current(&self) -> Arc<ClusterState> {
        self.head.lock().await.clone()
    }

    /// Subscribes to the stream of committed snapshots.
    ///
    /// The receiver starts at the snapshot current at subscription time and
    /// observes every commit after that.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ClusterState>> {
        self.tx.subscribe()
    }

    /// Atomically proposes a state transition.
    ///
    /// `update` runs against the head snapshot under the writer lock. When
    /// `expected_version` is set and no longer matches the head, the closure
    /// is not invoked and the submission resolves to [`Published::Superseded`].
    /// Errors from the closure abort the submission and leave the head
    /// untouched.
    #[instrument(skip(self, update), fields(source = source))]
    pub async fn submit_update<F, E>(
        &self,
        source: &str,
        expected_version: Option<u64>,
        update: F,
    ) -> Result<Published, E>
    where
        F: FnOnce(&ClusterState) -> Result<ClusterState, E>,
    {
        let mut head = self.head.lock().await;

        if let Some(expected) = expected_version {
            if head.version() != expected {
                debug!(
                    expected,
                    actual = head.version(),
                    "Submission superseded by newer cluster state"
                );
                return Ok(Published::Superseded {
                    expected,
                    actual: head.version(),
                });
            }
        }

        let proposed = update(&head)?;
        if proposed == **head {
            debug!(version = head.version(), "Update produced no change");
            return Ok(Published::Unchanged(head.clone()));
        }

        let committed = Arc::new(proposed.with_version(head.version() + 1));
        *head = committed.clone();
        self.tx.send_replace(committed.clone());
        debug!(version = committed.version(), "Committed cluster state");
        Ok(Published::Committed(committed))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::ClusterState;

    fn service() -> ClusterService {
        ClusterService::new(ClusterState::builder().build())
    }

    #[tokio::test]
    async fn test_commit_bumps_version_and_publishes() {
        let service = service();
        let mut rx = service.subscribe();

        let outcome = service
            .submit_update::<_, Infallible>("test", None, |state| {
                Ok(state.to_builder().setting("k", "v").build())
            })
            .await
            .unwrap();

        let Published::Committed(state) = outcome else {
            panic!("expected commit");
        };
        assert_eq!(state.version(), 1);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), state);
    }

    #[tokio::test]
    async fn test_identity_update_is_unchanged() {
        let service = service();
        let outcome = service
            .submit_update::<_, Infallible>("test", None, |state| Ok(state.clone()))
            .await
            .unwrap();
        assert!(matches!(outcome, Published::Unchanged(_)));
        assert_eq!(service.current().await.version(), 0);
    }

    #[tokio::test]
    async fn test_stale_expected_version_is_superseded() {
        let service = service();
        service
            .submit_update::<_, Infallible>("first", None, |state| {
                Ok(state.to_builder().setting("k", "v").build())
            })
            .await
            .unwrap();

        let outcome = service
            .submit_update::<_, Infallible>("stale", Some(0), |_| {
                panic!("update must not run when superseded")
            })
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            Published::Superseded {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_update_error_leaves_head_untouched() {
        let service = service();
        let result = service
            .submit_update::<_, &str>("failing", None, |_| Err("nope"))
            .await;
        assert_eq!(result.unwrap_err(), "nope");
        assert_eq!(service.current().await.version(), 0);
    }
}
