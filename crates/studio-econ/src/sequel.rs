//! Sequel eligibility projection for released pictures.
//!
//! A pure function of the parent's performance and the studio's standing.
//! Nothing here is persisted; it can be recomputed at any time.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use studio_core::{MovieProject, OutcomeCategory};

/// Carryover decay per episode.
pub const FRANCHISE_DECAY: f64 = 0.8;
/// Fatigue above this blocks another episode.
pub const FATIGUE_CAP: f64 = 0.6;
/// Heat needed to sell a sequel to partners.
pub const MIN_SEQUEL_HEAT: f32 = 15.0;
/// Weakest outcome that can still spawn a sequel.
pub const MIN_SEQUEL_OUTCOME: OutcomeCategory = OutcomeCategory::Solid;

/// Studio facts the calculator needs beyond the project itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequelContext {
    pub heat: f32,
    /// A project already continues this one.
    pub sequel_exists: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequelEligibility {
    pub eligible: bool,
    /// Present iff not eligible.
    pub reason: Option<String>,
    pub next_episode: u32,
    pub upfront_cost: Decimal,
    pub projected_momentum: f64,
    pub projected_fatigue: f64,
    pub carryover_hype: f64,
}

/// Evaluate whether `parent` can spawn a sequel.
pub fn evaluate(parent: &MovieProject, ctx: SequelContext) -> SequelEligibility {
    let next_episode = parent.episode() + 1;
    let decay = FRANCHISE_DECAY.powi((next_episode - 1) as i32);
    let projected_fatigue = 1.0 - decay;
    let upfront_cost =
        (parent.production_budget * Decimal::from_f64(0.3).unwrap_or(Decimal::ZERO)).round_dp(0);

    let (projected_momentum, outcome) = match &parent.release {
        Some(record) => {
            let quality = (0.6 * f64::from(record.audience_score)
                + 0.4 * f64::from(record.critical_score))
                / 100.0;
            (quality * decay, Some(record.report.outcome))
        }
        None => (0.0, None),
    };
    let carryover_hype = projected_momentum * 60.0;

    let reason = match outcome {
        None => Some("Project has not been released".to_string()),
        Some(o) if o < MIN_SEQUEL_OUTCOME => Some(format!(
            "Outcome '{o}' is below the '{MIN_SEQUEL_OUTCOME}' bar for a sequel"
        )),
        Some(_) if ctx.heat < MIN_SEQUEL_HEAT => Some(format!(
            "Studio heat {:.0} is below the {MIN_SEQUEL_HEAT:.0} needed for a sequel",
            ctx.heat
        )),
        Some(_) if ctx.sequel_exists => Some("A sequel is already in the works".to_string()),
        Some(_) if projected_fatigue > FATIGUE_CAP => Some(format!(
            "Franchise fatigue {projected_fatigue:.2} exceeds the {FATIGUE_CAP:.2} cap"
        )),
        Some(_) => None,
    };

    SequelEligibility {
        eligible: reason.is_none(),
        reason,
        next_episode,
        upfront_cost,
        projected_momentum,
        projected_fatigue,
        carryover_hype,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use studio_core::{
        FranchiseLink, Genre, Phase, ProjectId, ReleaseRecord, ReleaseReport,
    };

    fn released(outcome: OutcomeCategory, episode: u32) -> MovieProject {
        let mut p = MovieProject::in_development(
            ProjectId::from("proj-1"),
            "Harbor Lights",
            Genre::Action,
            7.5,
            Decimal::new(10_000_000, 0),
        );
        p.phase = Phase::Released;
        if episode > 1 {
            p.franchise = Some(FranchiseLink {
                parent: ProjectId::from("proj-0"),
                episode,
            });
        }
        p.release = Some(ReleaseRecord {
            released_week: 12,
            opening_weekend_gross: Decimal::new(5_000_000, 0),
            final_box_office: Decimal::new(20_000_000, 0),
            critical_score: 70.0,
            audience_score: 80.0,
            projected_roi: 0.4,
            awards_nominations: 0,
            awards_wins: 0,
            report: ReleaseReport {
                outcome,
                was_record_opening: true,
                profit: Decimal::new(6_000_000, 0),
                breakdown: BTreeMap::new(),
            },
        });
        p
    }

    const CTX: SequelContext = SequelContext {
        heat: 30.0,
        sequel_exists: false,
    };

    #[test]
    fn solid_release_is_eligible() {
        let e = evaluate(&released(OutcomeCategory::Solid, 1), CTX);
        assert!(e.eligible);
        assert!(e.reason.is_none());
        assert_eq!(e.next_episode, 2);
        assert_eq!(e.upfront_cost, Decimal::new(3_000_000, 0));
        assert!((e.projected_fatigue - 0.2).abs() < 1e-9);
        assert!((e.projected_momentum - 0.76 * 0.8).abs() < 1e-6);
        assert!((e.carryover_hype - e.projected_momentum * 60.0).abs() < 1e-9);
    }

    #[test]
    fn flop_is_not_eligible() {
        let e = evaluate(&released(OutcomeCategory::Flop, 1), CTX);
        assert!(!e.eligible);
        assert!(e.reason.unwrap().contains("below"));
    }

    #[test]
    fn unreleased_and_low_heat_are_blocked() {
        let mut p = released(OutcomeCategory::Hit, 1);
        p.release = None;
        p.phase = Phase::Distribution;
        assert!(!evaluate(&p, CTX).eligible);

        let cold = SequelContext {
            heat: 5.0,
            sequel_exists: false,
        };
        let e = evaluate(&released(OutcomeCategory::Hit, 1), cold);
        assert!(e.reason.unwrap().contains("heat"));

        let taken = SequelContext {
            heat: 50.0,
            sequel_exists: true,
        };
        assert!(!evaluate(&released(OutcomeCategory::Hit, 1), taken).eligible);
    }

    #[test]
    fn fatigue_caps_long_franchises() {
        // Episode 5 -> next 6: fatigue 1 - 0.8^5 = 0.672.
        let e = evaluate(&released(OutcomeCategory::Blockbuster, 5), CTX);
        assert!(!e.eligible);
        assert!(e.reason.unwrap().contains("fatigue"));
        // Episode 4 -> next 5: fatigue 0.5904.
        assert!(evaluate(&released(OutcomeCategory::Blockbuster, 4), CTX).eligible);
    }

    #[test]
    fn momentum_decays_per_episode() {
        let first = evaluate(&released(OutcomeCategory::Hit, 1), CTX);
        let third = evaluate(&released(OutcomeCategory::Hit, 3), CTX);
        assert!(third.projected_momentum < first.projected_momentum);
        assert!(third.projected_fatigue > first.projected_fatigue);
    }
}
