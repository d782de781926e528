use super::*;
use crate::error::SnapshotError;
use studio_core::{validate_snapshot, RngCheckpoint, StudioSnapshot, SCHEMA_VERSION};

impl StudioManager {
    /// Everything needed to rebuild this studio exactly, RNG position
    /// included.
    pub fn snapshot(&self) -> StudioSnapshot {
        StudioSnapshot {
            schema_version: SCHEMA_VERSION,
            rng: RngCheckpoint {
                seed: self.seed,
                word_pos: u64::try_from(self.rng.get_word_pos()).unwrap_or(u64::MAX),
            },
            config: self.config.clone(),
            state: self.state.clone(),
        }
    }

    /// Rebuild a studio from a validated snapshot.
    pub fn restore(snapshot: StudioSnapshot, content: ContentPack) -> Result<Self, SnapshotError> {
        validate_snapshot(&snapshot)?;
        let StudioSnapshot {
            rng: checkpoint,
            config,
            state,
            ..
        } = snapshot;
        let mut rng = ChaCha8Rng::seed_from_u64(checkpoint.seed);
        rng.set_word_pos(u128::from(checkpoint.word_pos));
        info!(week = state.week, cash = %state.cash(), "studio restored");
        Ok(Self {
            config,
            content,
            state,
            rng,
            seed: checkpoint.seed,
        })
    }
}
