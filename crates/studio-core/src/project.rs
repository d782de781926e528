//! Movie projects, their phase lifecycle, and the immutable release record.

use crate::ids::{DealId, PartnerId, ProjectId, TalentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Production phase of a project. Ordered by progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Development,
    PreProduction,
    Production,
    PostProduction,
    Distribution,
    Released,
}

impl Phase {
    /// The phase that follows this one, or `None` once released.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Development => Some(Phase::PreProduction),
            Phase::PreProduction => Some(Phase::Production),
            Phase::Production => Some(Phase::PostProduction),
            Phase::PostProduction => Some(Phase::Distribution),
            Phase::Distribution => Some(Phase::Released),
            Phase::Released => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Development => "Development",
            Phase::PreProduction => "Pre-production",
            Phase::Production => "Production",
            Phase::PostProduction => "Post-production",
            Phase::Distribution => "Distribution",
            Phase::Released => "Released",
        }
    }

    /// Phases whose scheduled work counts down each week.
    pub fn is_scheduled(self) -> bool {
        matches!(
            self,
            Phase::PreProduction | Phase::Production | Phase::PostProduction | Phase::Distribution
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Broad genre of a picture; feeds content generation and the release model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Horror,
    SciFi,
    Animation,
    Documentary,
}

/// Link from a sequel to the project it continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FranchiseLink {
    /// Project this one is a sequel of.
    pub parent: ProjectId,
    /// Episode number; originals are episode 1, so sequels start at 2.
    pub episode: u32,
}

/// Commercial outcome category, strictly ordered by performance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
    Bomb,
    Flop,
    Solid,
    Hit,
    Blockbuster,
}

impl OutcomeCategory {
    pub fn label(self) -> &'static str {
        match self {
            OutcomeCategory::Bomb => "bomb",
            OutcomeCategory::Flop => "flop",
            OutcomeCategory::Solid => "solid",
            OutcomeCategory::Hit => "hit",
            OutcomeCategory::Blockbuster => "blockbuster",
        }
    }

    /// Heat gained (or lost) when a release lands in this category.
    pub fn heat_delta(self) -> f32 {
        match self {
            OutcomeCategory::Bomb => -8.0,
            OutcomeCategory::Flop => -4.0,
            OutcomeCategory::Solid => 3.0,
            OutcomeCategory::Hit => 7.0,
            OutcomeCategory::Blockbuster => 12.0,
        }
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named input that contributes to a release's performance aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceDriver {
    ScriptQuality,
    ProductionQuality,
    CastPower,
    DirectorPower,
    MarketingSpend,
    Buzz,
    Specialization,
    Franchise,
    MarketNoise,
}

/// Structured outcome of a release. Created once and never changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReleaseReport {
    pub outcome: OutcomeCategory,
    pub was_record_opening: bool,
    /// Final box office minus production budget and marketing.
    pub profit: Decimal,
    /// Signed contribution of every driver; sums to the aggregate.
    pub breakdown: BTreeMap<PerformanceDriver, f64>,
}

impl ReleaseReport {
    /// Sum of all driver contributions.
    pub fn aggregate(&self) -> f64 {
        self.breakdown.values().sum()
    }

    /// Contribution of a single driver, zero when absent.
    pub fn contribution(&self, driver: PerformanceDriver) -> f64 {
        self.breakdown.get(&driver).copied().unwrap_or(0.0)
    }
}

/// Post-release figures. Present only once a project has been released.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub released_week: u32,
    pub opening_weekend_gross: Decimal,
    pub final_box_office: Decimal,
    /// 0-100 critics aggregate.
    pub critical_score: f32,
    /// 0-100 audience aggregate.
    pub audience_score: f32,
    /// Profit over total cost.
    pub projected_roi: f64,
    pub awards_nominations: u32,
    pub awards_wins: u32,
    pub report: ReleaseReport,
}

/// A picture on the studio's slate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieProject {
    pub id: ProjectId,
    pub title: String,
    pub genre: Genre,
    pub phase: Phase,
    pub director_id: Option<TalentId>,
    pub cast_ids: BTreeSet<TalentId>,
    /// Script quality on a 0-10 scale.
    pub script_quality: f32,
    /// Craft quality on a 0-10 scale, moved by crisis outcomes.
    pub production_quality: f32,
    /// Cost of making the picture; paid at greenlight.
    pub production_budget: Decimal,
    pub greenlight_approved: bool,
    pub scheduled_weeks_remaining: u32,
    pub marketing_budget: Decimal,
    /// Audience anticipation on a 0-100 scale.
    pub buzz: f32,
    pub release_window: Option<DealId>,
    pub release_week: Option<u32>,
    pub distributor: Option<PartnerId>,
    pub franchise: Option<FranchiseLink>,
    pub release: Option<ReleaseRecord>,
}

impl MovieProject {
    /// A fresh development-phase project.
    pub fn in_development(
        id: ProjectId,
        title: impl Into<String>,
        genre: Genre,
        script_quality: f32,
        production_budget: Decimal,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            genre,
            phase: Phase::Development,
            director_id: None,
            cast_ids: BTreeSet::new(),
            script_quality,
            production_quality: 6.0,
            production_budget,
            greenlight_approved: false,
            scheduled_weeks_remaining: 0,
            marketing_budget: Decimal::ZERO,
            buzz: 0.0,
            release_window: None,
            release_week: None,
            distributor: None,
            franchise: None,
            release: None,
        }
    }

    pub fn is_released(&self) -> bool {
        self.phase == Phase::Released
    }

    /// Episode number within its franchise; originals are episode 1.
    pub fn episode(&self) -> u32 {
        self.franchise.as_ref().map(|f| f.episode).unwrap_or(1)
    }

    /// Production budget plus marketing spend.
    pub fn total_cost(&self) -> Decimal {
        self.production_budget + self.marketing_budget
    }

    pub fn has_talent(&self, talent: &TalentId) -> bool {
        self.director_id.as_ref() == Some(talent) || self.cast_ids.contains(talent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_in_order_and_stop_at_released() {
        let mut phase = Phase::Development;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            assert!(next > phase);
            phase = next;
            seen.push(phase);
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(phase, Phase::Released);
        assert!(!Phase::Development.is_scheduled());
        assert!(!Phase::Released.is_scheduled());
    }

    #[test]
    fn outcome_order_matches_performance() {
        assert!(OutcomeCategory::Bomb < OutcomeCategory::Flop);
        assert!(OutcomeCategory::Flop < OutcomeCategory::Solid);
        assert!(OutcomeCategory::Solid < OutcomeCategory::Hit);
        assert!(OutcomeCategory::Hit < OutcomeCategory::Blockbuster);
    }

    #[test]
    fn report_aggregate_is_breakdown_sum() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(PerformanceDriver::ScriptQuality, 0.5);
        breakdown.insert(PerformanceDriver::Buzz, -0.25);
        let report = ReleaseReport {
            outcome: OutcomeCategory::Solid,
            was_record_opening: false,
            profit: Decimal::ZERO,
            breakdown,
        };
        assert!((report.aggregate() - 0.25).abs() < 1e-12);
        assert_eq!(report.contribution(PerformanceDriver::CastPower), 0.0);
    }
}
