//! A studio bound to a snapshot store.
//!
//! Actions run synchronously against the manager; every successful action
//! queues a snapshot on the background [`SaveWorker`]. Save failures never
//! reach the caller, they only show up in [`SaveStatus`].

use crate::error::ActionError;
use crate::studio::StudioManager;
use persistence::{SaveStatus, SaveWorker, SnapshotStore};
use std::sync::Arc;
use studio_content::ContentPack;
use studio_core::StudioConfig;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Session {
    studio: StudioManager,
    saver: SaveWorker,
    resumed: bool,
    load_warning: Option<String>,
}

impl Session {
    /// Resume from the store's snapshot, or found a new studio when there is
    /// none. An unreadable or invalid snapshot also starts fresh, with the
    /// reason kept in [`Session::load_warning`].
    pub async fn open<S: SnapshotStore>(
        store: Arc<S>,
        config: StudioConfig,
        content: ContentPack,
    ) -> Self {
        let (studio, resumed, load_warning) = match store.load().await {
            Ok(Some(snapshot)) => match StudioManager::restore(snapshot, content.clone()) {
                Ok(studio) => (studio, true, None),
                Err(e) => {
                    warn!(error = %e, "saved studio rejected; starting fresh");
                    (StudioManager::new(config, content), false, Some(e.to_string()))
                }
            },
            Ok(None) => (StudioManager::new(config, content), false, None),
            Err(e) => {
                warn!(error = %e, "could not load saved studio; starting fresh");
                (StudioManager::new(config, content), false, Some(e.to_string()))
            }
        };
        info!(week = studio.week(), resumed, "session opened");
        Self {
            studio,
            saver: SaveWorker::spawn(store),
            resumed,
            load_warning,
        }
    }

    pub fn studio(&self) -> &StudioManager {
        &self.studio
    }

    /// Run an action; on success queue a save of the resulting state.
    pub fn act<T>(
        &mut self,
        action: impl FnOnce(&mut StudioManager) -> Result<T, ActionError>,
    ) -> Result<T, ActionError> {
        let result = action(&mut self.studio);
        if result.is_ok() {
            self.saver.enqueue(self.studio.snapshot());
        }
        result
    }

    pub fn resumed(&self) -> bool {
        self.resumed
    }

    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.saver.status()
    }

    pub fn subscribe_saves(&self) -> watch::Receiver<SaveStatus> {
        self.saver.subscribe()
    }

    /// Wait for queued saves to land and return the final status.
    pub async fn close(self) -> SaveStatus {
        self.saver.shutdown().await
    }
}
