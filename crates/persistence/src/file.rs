use crate::{PersistenceError, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use studio_core::StudioSnapshot;
use tracing::debug;

/// On-disk encoding of a snapshot file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotFormat {
    Json,
    Bincode,
}

impl SnapshotFormat {
    /// Parses `json` or `bincode`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(SnapshotFormat::Json),
            "bincode" | "bin" => Some(SnapshotFormat::Bincode),
            _ => None,
        }
    }

    pub fn encode(self, snapshot: &StudioSnapshot) -> Result<Vec<u8>, PersistenceError> {
        match self {
            SnapshotFormat::Json => Ok(serde_json::to_vec_pretty(snapshot)?),
            SnapshotFormat::Bincode => Ok(bincode::serialize(snapshot)?),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<StudioSnapshot, PersistenceError> {
        match self {
            SnapshotFormat::Json => Ok(serde_json::from_slice(bytes)?),
            SnapshotFormat::Bincode => Ok(bincode::deserialize(bytes)?),
        }
    }
}

/// A single snapshot file, replaced atomically on every save.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    format: SnapshotFormat,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> impl Future<Output = Result<Option<StudioSnapshot>, PersistenceError>> + Send {
        let path = self.path.clone();
        let format = self.format;
        async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let snapshot = format.decode(&bytes)?;
            debug!(path = %path.display(), week = snapshot.state.week, "snapshot loaded");
            Ok(Some(snapshot))
        }
    }

    fn save(
        &self,
        snapshot: &StudioSnapshot,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        let encoded = self.format.encode(snapshot);
        let week = snapshot.state.week;
        let path = self.path.clone();
        let temp = self.temp_path();
        async move {
            let bytes = encoded?;
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            // Write-then-rename so a crash never leaves a torn snapshot behind.
            tokio::fs::write(&temp, &bytes).await?;
            tokio::fs::rename(&temp, &path).await?;
            debug!(path = %path.display(), week, bytes = bytes.len(), "snapshot saved");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{RngCheckpoint, StudioConfig, StudioState, SCHEMA_VERSION};

    fn snapshot(week: u32) -> StudioSnapshot {
        let config = StudioConfig::default();
        let mut state = StudioState::new(&config);
        state.week = week;
        StudioSnapshot {
            schema_version: SCHEMA_VERSION,
            rng: RngCheckpoint {
                seed: config.rng_seed,
                word_pos: 64,
            },
            config,
            state,
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("studio-persistence-tests");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let store = FileStore::new(scratch("absent.json"), SnapshotFormat::Json);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn json_and_bincode_roundtrip() {
        for (name, format) in [
            ("round.json", SnapshotFormat::Json),
            ("round.bin", SnapshotFormat::Bincode),
        ] {
            let store = FileStore::new(scratch(name), format);
            let snap = snapshot(7);
            store.save(&snap).await.unwrap();
            let back = store.load().await.unwrap().unwrap();
            assert_eq!(back, snap);
        }
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let path = scratch("corrupt.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let store = FileStore::new(path, SnapshotFormat::Json);
        assert!(matches!(
            store.load().await,
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(SnapshotFormat::parse("JSON"), Some(SnapshotFormat::Json));
        assert_eq!(SnapshotFormat::parse("bin"), Some(SnapshotFormat::Bincode));
        assert_eq!(SnapshotFormat::parse("yaml"), None);
    }
}
