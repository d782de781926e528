#![deny(warnings)]

//! Core domain models and invariants for Studio Tycoon.
//!
//! This crate defines the serializable types owned by a studio (projects,
//! talent, crises, decisions, arcs, the ledger and the chronicle) together
//! with validation helpers that guard the structural invariants of a
//! persisted snapshot.

pub mod arc;
pub mod calendar;
pub mod chronicle;
pub mod config;
pub mod events;
pub mod ids;
pub mod ledger;
pub mod project;
pub mod state;
pub mod talent;
pub mod tier;

pub use arc::{ArcKind, ArcState, ArcSubject, NarrativeArc, Partner, PartnerKind, Stance};
pub use chronicle::{Chronicle, ChronicleCategory, ChronicleEntry};
pub use config::{PhaseDurations, StudioConfig};
pub use events::{Crisis, CrisisOption, DecisionItem, DecisionOption, Severity};
pub use ids::{CrisisId, DealId, DecisionId, OptionId, PartnerId, ProjectId, ScriptId, TalentId};
pub use ledger::{Bankruptcy, FinancialLedger};
pub use project::{
    FranchiseLink, Genre, MovieProject, OutcomeCategory, PerformanceDriver, Phase, ReleaseRecord,
    ReleaseReport,
};
pub use state::{RngCheckpoint, StudioSnapshot, StudioState, SCHEMA_VERSION};
pub use talent::{Script, Talent, TalentRole};
pub use tier::{Specialization, Tier, TierGate};

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use thiserror::Error;

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Rating outside its 0-10 scale.
    #[error("{field} must be within [0, 10], got {value}")]
    RatingOutOfRange { field: &'static str, value: f32 },
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
    /// Budgets and fees must be non-negative.
    #[error("negative monetary value is invalid")]
    NegativeMoney,
    /// Two entities share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    /// A reference points at nothing.
    #[error("unknown reference: {0}")]
    UnknownReference(String),
    /// Post-release fields present before release or missing after it.
    #[error("release record inconsistent with phase for project {0}")]
    ReleaseRecordMismatch(String),
    /// Snapshot written by an incompatible layout.
    #[error("unsupported snapshot schema version {0}")]
    UnsupportedSchema(u32),
    /// Week counter starts at 1.
    #[error("week must be >= 1")]
    InvalidWeek,
}

fn check_rating(field: &'static str, value: f32) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if !(0.0..=10.0).contains(&value) {
        return Err(ValidationError::RatingOutOfRange { field, value });
    }
    Ok(())
}

/// Validate a single project in isolation.
pub fn validate_project(p: &MovieProject) -> Result<(), ValidationError> {
    check_rating("script_quality", p.script_quality)?;
    check_rating("production_quality", p.production_quality)?;
    if !p.buzz.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if p.production_budget < Decimal::ZERO || p.marketing_budget < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    if p.is_released() != p.release.is_some() {
        return Err(ValidationError::ReleaseRecordMismatch(p.id.0.clone()));
    }
    Ok(())
}

/// Validate a roster entry.
pub fn validate_talent(t: &Talent) -> Result<(), ValidationError> {
    check_rating("power", t.power)?;
    if t.fee < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    Ok(())
}

/// Validate the whole aggregate, including cross-references between
/// projects, talent, partners and pending crises.
pub fn validate_state(state: &StudioState) -> Result<(), ValidationError> {
    if state.week == 0 {
        return Err(ValidationError::InvalidWeek);
    }
    if !state.heat.is_finite() {
        return Err(ValidationError::NonFinite);
    }

    let mut talent_ids: BTreeSet<&TalentId> = BTreeSet::new();
    for t in &state.talent {
        validate_talent(t)?;
        if !talent_ids.insert(&t.id) {
            return Err(ValidationError::DuplicateId(t.id.0.clone()));
        }
    }

    let mut project_ids: BTreeSet<&ProjectId> = BTreeSet::new();
    for p in &state.projects {
        validate_project(p)?;
        if !project_ids.insert(&p.id) {
            return Err(ValidationError::DuplicateId(p.id.0.clone()));
        }
        for t in p.director_id.iter().chain(p.cast_ids.iter()) {
            if !talent_ids.contains(t) {
                return Err(ValidationError::UnknownReference(t.0.clone()));
            }
        }
        if let Some(partner) = &p.distributor {
            if state.partner(partner).is_none() {
                return Err(ValidationError::UnknownReference(partner.0.clone()));
            }
        }
    }
    for t in &state.talent {
        if let Some(p) = &t.committed_to {
            if !project_ids.contains(p) {
                return Err(ValidationError::UnknownReference(p.0.clone()));
            }
        }
    }
    for c in &state.pending_crises {
        if let Some(p) = &c.project_id {
            if !project_ids.contains(p) {
                return Err(ValidationError::UnknownReference(p.0.clone()));
            }
        }
    }
    for s in &state.script_market {
        check_rating("script quality", s.quality)?;
        if s.asking_price < Decimal::ZERO || s.production_budget < Decimal::ZERO {
            return Err(ValidationError::NegativeMoney);
        }
    }
    Ok(())
}

/// Validate a snapshot before it is restored.
pub fn validate_snapshot(snapshot: &StudioSnapshot) -> Result<(), ValidationError> {
    if snapshot.schema_version != SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedSchema(snapshot.schema_version));
    }
    validate_state(&snapshot.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn director(id: &str) -> Talent {
        Talent {
            id: TalentId::from(id),
            name: "Ada Marsh".to_string(),
            role: TalentRole::Director,
            fee: Decimal::new(500_000, 0),
            power: 6.5,
            committed_to: None,
        }
    }

    fn project(id: &str, quality: f32) -> MovieProject {
        MovieProject::in_development(
            ProjectId::from(id),
            "Night Ferry",
            Genre::Drama,
            quality,
            Decimal::new(4_000_000, 0),
        )
    }

    #[test]
    fn serde_roundtrip_project() {
        let p = project("proj-1", 7.2);
        let s = serde_json::to_string(&p).unwrap();
        let back: MovieProject = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
        assert!(back.release.is_none());
    }

    #[test]
    fn studio_snapshot_roundtrip() {
        let config = StudioConfig::default();
        let mut state = StudioState::new(&config);
        state.talent.push(director("tal-1"));
        let mut p = project("proj-1", 7.0);
        p.director_id = Some(TalentId::from("tal-1"));
        state.projects.push(p);
        state.chronicle.record(
            1,
            config.season_start,
            ChronicleCategory::CrisisResolved,
            "Weather delay handled",
        );
        let snapshot = StudioSnapshot {
            schema_version: SCHEMA_VERSION,
            rng: RngCheckpoint {
                seed: config.rng_seed,
                word_pos: 0,
            },
            config,
            state,
        };
        validate_snapshot(&snapshot).unwrap();
        let s = serde_json::to_string_pretty(&snapshot).unwrap();
        let back: StudioSnapshot = serde_json::from_str(&s).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.state.chronicle.len(), 1);
    }

    #[test]
    fn dangling_director_is_rejected() {
        let mut state = StudioState::new(&StudioConfig::default());
        let mut p = project("proj-1", 7.0);
        p.director_id = Some(TalentId::from("ghost"));
        state.projects.push(p);
        assert_eq!(
            validate_state(&state),
            Err(ValidationError::UnknownReference("ghost".to_string()))
        );
    }

    #[test]
    fn release_record_must_match_phase() {
        let mut p = project("proj-2", 7.0);
        p.phase = Phase::Released;
        assert_eq!(
            validate_project(&p),
            Err(ValidationError::ReleaseRecordMismatch("proj-2".to_string()))
        );
    }

    #[test]
    fn wrong_schema_is_rejected() {
        let config = StudioConfig::default();
        let snapshot = StudioSnapshot {
            schema_version: SCHEMA_VERSION + 1,
            rng: RngCheckpoint { seed: 1, word_pos: 0 },
            state: StudioState::new(&config),
            config,
        };
        assert_eq!(
            validate_snapshot(&snapshot),
            Err(ValidationError::UnsupportedSchema(SCHEMA_VERSION + 1))
        );
    }

    #[test]
    fn minted_ids_are_unique() {
        let mut state = StudioState::new(&StudioConfig::default());
        let a = state.mint_id("proj");
        let b = state.mint_id("crisis");
        assert_eq!(a, "proj-1");
        assert_eq!(b, "crisis-2");
    }

    proptest! {
        #[test]
        fn ratings_in_range_validate(q in 0.0f32..=10.0, pq in 0.0f32..=10.0) {
            let mut p = project("proj-9", q);
            p.production_quality = pq;
            prop_assert!(validate_project(&p).is_ok());
        }

        #[test]
        fn ratings_out_of_range_fail(q in 10.01f32..100.0) {
            let p = project("proj-9", q);
            prop_assert!(validate_project(&p).is_err());
        }
    }
}
