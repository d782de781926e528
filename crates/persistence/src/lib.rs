#![deny(warnings)]

//! Persistence layer: snapshot stores and the background save worker.
//!
//! A store holds at most one "current" snapshot of a studio. Saving is
//! fire-and-forget from the caller's point of view: the [`SaveWorker`] owns
//! the store, coalesces queued snapshots to the newest one, and publishes
//! the outcome of each write on a watch channel.

mod file;
mod memory;
mod sqlite;
mod worker;

pub use file::{FileStore, SnapshotFormat};
pub use memory::MemoryStore;
pub use sqlite::{create_save, init_db, SqliteStore};
pub use worker::{SaveStatus, SaveWorker};

use std::future::Future;
use studio_core::StudioSnapshot;
use thiserror::Error;

/// Returns the default SQLite URL used for local saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/main.db"
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(String),
    #[error("json encoding error: {0}")]
    Json(String),
    #[error("bincode encoding error: {0}")]
    Bincode(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("migration error: {0}")]
    Migrate(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e.to_string())
    }
}

impl From<bincode::Error> for PersistenceError {
    fn from(e: bincode::Error) -> Self {
        PersistenceError::Bincode(e.to_string())
    }
}

impl From<sqlx::Error> for PersistenceError {
    fn from(e: sqlx::Error) -> Self {
        PersistenceError::Database(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for PersistenceError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        PersistenceError::Migrate(e.to_string())
    }
}

/// Somewhere a studio snapshot can be written to and read back from.
///
/// `load` returns `Ok(None)` when nothing has been saved yet; a snapshot that
/// exists but cannot be decoded is an error.
pub trait SnapshotStore: Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = Result<Option<StudioSnapshot>, PersistenceError>> + Send;

    fn save(
        &self,
        snapshot: &StudioSnapshot,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn url_is_sqlite() {
        assert!(default_sqlite_url().starts_with("sqlite://"));
    }

    #[test]
    fn errors_render_their_source() {
        let e = PersistenceError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert_eq!(e.to_string(), "io error: missing");
    }
}
