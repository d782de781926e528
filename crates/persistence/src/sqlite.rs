use crate::{PersistenceError, SnapshotStore};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::future::Future;
use std::str::FromStr;
use studio_core::StudioSnapshot;
use tracing::{debug, info};

/// Snapshots retained per save slot.
const HISTORY_DEPTH: i64 = 5;

/// Open (creating if needed) the database at `url` and apply migrations.
pub async fn init_db(url: &str) -> Result<SqlitePool, PersistenceError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    // In-memory databases are per connection.
    let max = if url.contains(":memory:") { 1 } else { 4 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max)
        .connect_with(options)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("database ready at {}", url);
    Ok(pool)
}

/// Create the named save slot, or refresh its description if it exists.
/// Returns the slot id.
pub async fn create_save(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<i64, PersistenceError> {
    let row = sqlx::query(
        "INSERT INTO saves (name, description, created_at) VALUES (?, ?, ?) \
         ON CONFLICT(name) DO UPDATE SET description = excluded.description \
         RETURNING id",
    )
    .bind(name)
    .bind(description)
    .bind(Utc::now().to_rfc3339())
    .fetch_one(pool)
    .await?;
    Ok(row.try_get::<i64, _>("id")?)
}

/// Save slot backed by SQLite. Each save appends a JSON snapshot row and
/// prunes history beyond a few entries; load returns the newest row.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    save_id: i64,
    slot: String,
}

impl SqliteStore {
    pub async fn open(url: &str, slot: &str) -> Result<Self, PersistenceError> {
        let pool = init_db(url).await?;
        Self::with_pool(pool, slot).await
    }

    pub async fn with_pool(pool: SqlitePool, slot: &str) -> Result<Self, PersistenceError> {
        let save_id = create_save(&pool, slot, None).await?;
        Ok(Self {
            pool,
            save_id,
            slot: slot.to_string(),
        })
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Weeks of the retained snapshots, newest first.
    pub async fn history(&self) -> Result<Vec<u32>, PersistenceError> {
        let rows = sqlx::query("SELECT week FROM snapshots WHERE save_id = ? ORDER BY id DESC")
            .bind(self.save_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| -> Result<u32, PersistenceError> {
                let week: i64 = r.try_get("week")?;
                Ok(u32::try_from(week).unwrap_or(0))
            })
            .collect()
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&self) -> impl Future<Output = Result<Option<StudioSnapshot>, PersistenceError>> + Send {
        let pool = self.pool.clone();
        let save_id = self.save_id;
        async move {
            let row = sqlx::query(
                "SELECT payload FROM snapshots WHERE save_id = ? ORDER BY id DESC LIMIT 1",
            )
            .bind(save_id)
            .fetch_optional(&pool)
            .await?;
            match row {
                Some(row) => {
                    let payload: String = row.try_get("payload")?;
                    Ok(Some(serde_json::from_str(&payload)?))
                }
                None => Ok(None),
            }
        }
    }

    fn save(
        &self,
        snapshot: &StudioSnapshot,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send {
        let payload = serde_json::to_string(snapshot);
        let week = i64::from(snapshot.state.week);
        let pool = self.pool.clone();
        let save_id = self.save_id;
        async move {
            let payload = payload?;
            let mut tx = pool.begin().await?;
            sqlx::query(
                "INSERT INTO snapshots (save_id, week, payload, saved_at) VALUES (?, ?, ?, ?)",
            )
            .bind(save_id)
            .bind(week)
            .bind(payload)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;
            sqlx::query(
                "DELETE FROM snapshots WHERE save_id = ? AND id NOT IN \
                 (SELECT id FROM snapshots WHERE save_id = ? ORDER BY id DESC LIMIT ?)",
            )
            .bind(save_id)
            .bind(save_id)
            .bind(HISTORY_DEPTH)
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            debug!(save_id, week, "snapshot row written");
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
            rng: RngCheckpoint { seed: 3, word_pos: 8 },
            config,
            state,
        }
    }

    #[tokio::test]
    async fn newest_snapshot_wins_and_history_is_pruned() {
        let store = SqliteStore::open("sqlite::memory:", "career").await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        for week in 1..=8 {
            store.save(&snapshot(week)).await.unwrap();
        }
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.state.week, 8);
        assert_eq!(store.history().await.unwrap(), vec![8, 7, 6, 5, 4]);
    }

    #[tokio::test]
    async fn save_slots_are_independent() {
        let pool = init_db("sqlite::memory:").await.unwrap();
        let a = SqliteStore::with_pool(pool.clone(), "a").await.unwrap();
        let b = SqliteStore::with_pool(pool.clone(), "b").await.unwrap();
        a.save(&snapshot(3)).await.unwrap();
        assert!(b.load().await.unwrap().is_none());
        // Re-creating a slot keeps its id.
        let again = create_save(&pool, "a", Some("again")).await.unwrap();
        assert_eq!(again, a.save_id);
    }
}
