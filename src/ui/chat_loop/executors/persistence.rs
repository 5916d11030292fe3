//! Background session persistence.
//!
//! Snapshots are written in the order they were queued by a single worker
//! task, so an older snapshot never lands after a newer one. Each write runs
//! on the blocking pool and failures are logged, never surfaced to the
//! controller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::core::app::SideEffect;
use crate::core::session::SessionSnapshot;
use crate::core::session_store::SessionStore;

pub struct PersistenceWorker {
    tx: mpsc::UnboundedSender<SessionSnapshot>,
    handle: JoinHandle<()>,
}

impl PersistenceWorker {
    pub fn spawn(store: Arc<dyn SessionStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SessionSnapshot>();
        let handle = tokio::spawn(async move {
            while let Some(snapshot) = rx.recv().await {
                let store = store.clone();
                let session_id = snapshot.session_id.clone();
                let turns = snapshot.turns.len();
                match tokio::task::spawn_blocking(move || store.save(&snapshot)).await {
                    Ok(Ok(())) => debug!(session = %session_id, turns, "session saved"),
                    Ok(Err(err)) => {
                        warn!(session = %session_id, error = %err, "failed to save session")
                    }
                    Err(err) => {
                        warn!(session = %session_id, error = %err, "session save task failed")
                    }
                }
            }
        });
        Self { tx, handle }
    }

    pub fn submit(&self, effect: SideEffect) {
        match effect {
            SideEffect::PersistSession(snapshot) => {
                if self.tx.send(snapshot).is_err() {
                    warn!("persistence worker stopped; dropping session snapshot");
                }
            }
        }
    }

    /// Stop accepting work and wait up to `timeout` for queued writes.
    /// Returns `false` if the deadline passed first.
    pub async fn shutdown(self, timeout: Duration) -> bool {
        let Self { tx, handle } = self;
        drop(tx);
        match tokio::time::timeout(timeout, handle).await {
            Ok(_) => true,
            Err(_) => {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "gave up waiting for session writes"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session_store::PersistError;
    use crate::utils::test_utils::{create_test_session, MemorySessionStore};

    #[tokio::test]
    async fn writes_snapshots_in_submission_order() {
        let store = Arc::new(MemorySessionStore::default());
        let worker = PersistenceWorker::spawn(store.clone());

        let mut session = create_test_session();
        worker.submit(SideEffect::PersistSession(session.snapshot()));
        session
            .context
            .push(crate::core::session::Speaker::User, "hello");
        worker.submit(SideEffect::PersistSession(session.snapshot()));

        assert!(worker.shutdown(Duration::from_secs(2)).await);

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].turns.is_empty());
        assert_eq!(saved[1].turns.len(), 1);
    }

    struct FailingStore;

    impl SessionStore for FailingStore {
        fn save(&self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
            Err(PersistError::InvalidSessionId(snapshot.session_id.clone()))
        }
    }

    #[tokio::test]
    async fn failed_writes_do_not_stop_the_worker() {
        let worker = PersistenceWorker::spawn(Arc::new(FailingStore));
        let session = create_test_session();
        worker.submit(SideEffect::PersistSession(session.snapshot()));
        worker.submit(SideEffect::PersistSession(session.snapshot()));

        assert!(worker.shutdown(Duration::from_secs(2)).await);
    }

    struct SlowStore;

    impl SessionStore for SlowStore {
        fn save(&self, _snapshot: &SessionSnapshot) -> Result<(), PersistError> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_is_bounded_by_timeout() {
        let worker = PersistenceWorker::spawn(Arc::new(SlowStore));
        worker.submit(SideEffect::PersistSession(create_test_session().snapshot()));

        assert!(!worker.shutdown(Duration::from_millis(20)).await);
    }
}
