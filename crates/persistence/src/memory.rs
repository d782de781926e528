use crate::{PersistenceError, SnapshotStore};
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use studio_core::StudioSnapshot;

/// In-process store for tests and headless runs. Can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: Mutex<Option<StudioSnapshot>>,
    fail_saves: AtomicBool,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: StudioSnapshot) -> Self {
        let store = Self::default();
        if let Ok(mut current) = store.current.lock() {
            *current = Some(snapshot);
        }
        store
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<StudioSnapshot> {
        self.current.lock().ok().and_then(|c| c.clone())
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> impl Future<Output = Result<Option<StudioSnapshot>, PersistenceError>> + Send {
        let result = self
            .current
            .lock()
            .map(|c| c.clone())
            .map_err(|_| PersistenceError::Unavailable("memory store poisoned".to_string()));
        async move { result }
    }

    fn save(
        &self,
        snapshot: &StudioSnapshot,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        let result = if self.fail_saves.load(Ordering::SeqCst) {
            Err(PersistenceError::Unavailable("writes disabled".to_string()))
        } else {
            match self.current.lock() {
                Ok(mut current) => {
                    *current = Some(snapshot.clone());
                    self.writes.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                Err(_) => Err(PersistenceError::Unavailable(
                    "memory store poisoned".to_string(),
                )),
            }
        };
        async move { result }
    }
}
