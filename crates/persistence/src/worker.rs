use crate::SnapshotStore;
use std::sync::Arc;
use studio_core::StudioSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Outcome of the most recent background save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveStatus {
    /// False once a save has failed and no later save has succeeded.
    pub last_ok: bool,
    pub last_error: Option<String>,
    pub last_saved_week: Option<u32>,
    pub saves_completed: u64,
    pub failures: u64,
}

impl Default for SaveStatus {
    fn default() -> Self {
        Self {
            last_ok: true,
            last_error: None,
            last_saved_week: None,
            saves_completed: 0,
            failures: 0,
        }
    }
}

/// Background task that writes snapshots to a store without blocking the
/// caller. Snapshots queued while a write is in flight are coalesced so only
/// the newest one is written next.
#[derive(Debug)]
pub struct SaveWorker {
    tx: mpsc::UnboundedSender<StudioSnapshot>,
    status: watch::Receiver<SaveStatus>,
    handle: JoinHandle<()>,
}

impl SaveWorker {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn<S: SnapshotStore>(store: Arc<S>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<StudioSnapshot>();
        let (status_tx, status) = watch::channel(SaveStatus::default());
        let handle = tokio::spawn(async move {
            while let Some(mut snapshot) = rx.recv().await {
                let mut skipped = 0usize;
                while let Ok(newer) = rx.try_recv() {
                    snapshot = newer;
                    skipped += 1;
                }
                let week = snapshot.state.week;
                match store.save(&snapshot).await {
                    Ok(()) => {
                        debug!(week, skipped, "background save complete");
                        status_tx.send_modify(|s| {
                            s.last_ok = true;
                            s.last_error = None;
                            s.last_saved_week = Some(week);
                            s.saves_completed += 1;
                        });
                    }
                    Err(e) => {
                        warn!(week, error = %e, "background save failed");
                        status_tx.send_modify(|s| {
                            s.last_ok = false;
                            s.last_error = Some(e.to_string());
                            s.failures += 1;
                        });
                    }
                }
            }
        });
        Self { tx, status, handle }
    }

    /// Queue a snapshot for writing. Never blocks.
    pub fn enqueue(&self, snapshot: StudioSnapshot) {
        if self.tx.send(snapshot).is_err() {
            warn!("save worker has stopped; snapshot dropped");
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Stop accepting snapshots, wait for queued writes to finish and return
    /// the final status.
    pub async fn shutdown(self) -> SaveStatus {
        let Self { tx, status, handle } = self;
        drop(tx);
        if let Err(e) = handle.await {
            warn!(error = %e, "save worker terminated abnormally");
        }
        let last = status.borrow().clone();
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use studio_core::{RngCheckpoint, StudioConfig, StudioState, SCHEMA_VERSION};

    fn snapshot(week: u32) -> StudioSnapshot {
        let config = StudioConfig::default();
        let mut state = StudioState::new(&config);
        state.week = week;
        StudioSnapshot {
            schema_version: SCHEMA_VERSION,
            rng: RngCheckpoint { seed: 1, word_pos: 0 },
            config,
            state,
        }
    }

    #[tokio::test]
    async fn newest_snapshot_is_persisted() {
        let store = Arc::new(MemoryStore::new());
        let worker = SaveWorker::spawn(store.clone());
        for week in 1..=20 {
            worker.enqueue(snapshot(week));
        }
        let status = worker.shutdown().await;
        assert!(status.last_ok);
        assert_eq!(status.last_saved_week, Some(20));
        assert!(status.saves_completed >= 1 && status.saves_completed <= 20);
        assert_eq!(store.current().unwrap().state.week, 20);
    }

    #[tokio::test]
    async fn failures_are_reported_not_raised() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);
        let worker = SaveWorker::spawn(store.clone());
        worker.enqueue(snapshot(2));
        let status = worker.shutdown().await;
        assert!(!status.last_ok);
        assert!(status.last_error.is_some());
        assert_eq!(status.failures, 1);
        assert!(store.current().is_none());
    }
}
