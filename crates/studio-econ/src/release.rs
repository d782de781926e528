//! Release simulation: box office, reception, awards and the outcome report.
//!
//! Every driver contributes a signed amount to a performance aggregate. The
//! aggregate is the exact sum of the breakdown, and box office is
//! `total_cost * 2^aggregate` (clamped), so the outcome category is a
//! monotone function of the aggregate. All randomness comes from a ChaCha8
//! stream seeded by the caller.

use crate::EconError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use studio_core::{
    OutcomeCategory, PerformanceDriver, ReleaseRecord, ReleaseReport, Specialization,
};

/// Bound of the market noise driver, in aggregate units.
pub const NOISE_BOUND: f64 = 0.25;
/// Revenue multiple floor and ceiling.
pub const MIN_MULTIPLE: f64 = 0.05;
pub const MAX_MULTIPLE: f64 = 12.0;

/// Everything about a picture that matters on release day.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseInputs {
    pub week: u32,
    pub script_quality: f32,
    pub production_quality: f32,
    /// Director power, zero when unattached.
    pub director_power: f32,
    /// Mean power of the attached cast, zero when empty.
    pub cast_power: f32,
    pub production_budget: Decimal,
    pub marketing_budget: Decimal,
    pub buzz: f32,
    pub specialization: Specialization,
    pub episode: u32,
    /// Best opening weekend the studio has had so far.
    pub prior_record_opening: Option<Decimal>,
}

/// Outcome category for a return on investment.
///
/// Thresholds: blockbuster >= 2.0, hit >= 0.75, solid >= 0.1, flop >= -0.5.
pub fn outcome_for_roi(roi: f64) -> OutcomeCategory {
    if roi >= 2.0 {
        OutcomeCategory::Blockbuster
    } else if roi >= 0.75 {
        OutcomeCategory::Hit
    } else if roi >= 0.1 {
        OutcomeCategory::Solid
    } else if roi >= -0.5 {
        OutcomeCategory::Flop
    } else {
        OutcomeCategory::Bomb
    }
}

/// Box office as a multiple of total cost for a given aggregate.
pub fn revenue_multiple(aggregate: f64) -> f64 {
    2f64.powf(aggregate).clamp(MIN_MULTIPLE, MAX_MULTIPLE)
}

fn marketing_contribution(production: Decimal, marketing: Decimal) -> Result<f64, EconError> {
    if marketing <= Decimal::ZERO {
        return Ok(-0.8);
    }
    let ratio = (marketing / production).to_f64().ok_or(EconError::NonFinite)?;
    // 40% of the production budget is the neutral spend.
    Ok((0.35 * (ratio / 0.4).log2()).clamp(-0.8, 0.6))
}

/// Deterministic part of the breakdown (everything except market noise).
pub fn driver_contributions(
    inputs: &ReleaseInputs,
) -> Result<BTreeMap<PerformanceDriver, f64>, EconError> {
    let script = (f64::from(inputs.script_quality) - 6.0) * 0.22;
    let production = (f64::from(inputs.production_quality) - 6.0) * 0.12;
    let cast = (f64::from(inputs.cast_power) - 5.0) * 0.10;
    let director = (f64::from(inputs.director_power) - 5.0) * 0.08;
    let marketing = marketing_contribution(inputs.production_budget, inputs.marketing_budget)?;
    let buzz = (f64::from(inputs.buzz.clamp(0.0, 100.0)) - 30.0) / 100.0 * 0.8;
    let specialization = match inputs.specialization {
        Specialization::Balanced => 0.0,
        Specialization::Blockbuster => 0.25 * (cast + marketing).max(0.0),
        Specialization::Prestige => 0.3 * script.max(0.0),
        Specialization::Indie => {
            if inputs.production_budget <= Decimal::new(8_000_000, 0) {
                0.05 + 0.2 * script.max(0.0)
            } else {
                0.0
            }
        }
    };
    let franchise = if inputs.episode <= 1 {
        0.0
    } else {
        0.25 - 0.12 * f64::from(inputs.episode - 2)
    };

    let contributions = [
        (PerformanceDriver::ScriptQuality, script),
        (PerformanceDriver::ProductionQuality, production),
        (PerformanceDriver::CastPower, cast),
        (PerformanceDriver::DirectorPower, director),
        (PerformanceDriver::MarketingSpend, marketing),
        (PerformanceDriver::Buzz, buzz),
        (PerformanceDriver::Specialization, specialization),
        (PerformanceDriver::Franchise, franchise),
    ];
    if contributions.iter().any(|(_, v)| !v.is_finite()) {
        return Err(EconError::NonFinite);
    }
    Ok(contributions.into_iter().collect())
}

fn to_decimal(v: f64) -> Result<Decimal, EconError> {
    Decimal::from_f64(v).ok_or(EconError::NonFinite)
}

/// Run the one-time release computation for a picture.
pub fn simulate(inputs: &ReleaseInputs, seed: u64) -> Result<ReleaseRecord, EconError> {
    if inputs.production_budget <= Decimal::ZERO {
        return Err(EconError::InvalidBudget);
    }
    if inputs.marketing_budget < Decimal::ZERO {
        return Err(EconError::InvalidPrice);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut breakdown = driver_contributions(inputs)?;
    let noise: f64 = rng.gen_range(-NOISE_BOUND..=NOISE_BOUND);
    breakdown.insert(PerformanceDriver::MarketNoise, noise);
    let aggregate: f64 = breakdown.values().sum();
    let multiple = revenue_multiple(aggregate);

    let total_cost = inputs.production_budget + inputs.marketing_budget;
    let final_box_office = (total_cost * to_decimal(multiple)?).round_dp(0);
    let opening_share = 0.22 + 0.18 * f64::from(inputs.buzz.clamp(0.0, 100.0)) / 100.0;
    let opening_weekend_gross = (final_box_office * to_decimal(opening_share)?).round_dp(0);
    let profit = final_box_office - total_cost;
    let roi = multiple - 1.0;
    let outcome = outcome_for_roi(roi);

    let script = f64::from(inputs.script_quality);
    let craft = f64::from(inputs.production_quality);
    let prestige = inputs.specialization == Specialization::Prestige;
    let critic_noise: f64 = rng.gen_range(-4.0..=4.0);
    let critical = script * 6.0
        + craft * 2.5
        + (f64::from(inputs.director_power) - 5.0) * 2.0
        + if prestige { 4.0 } else { 0.0 }
        + critic_noise;
    let audience_noise: f64 = rng.gen_range(-5.0..=5.0);
    let audience = script * 3.5
        + craft * 1.5
        + f64::from(inputs.cast_power) * 2.5
        + f64::from(inputs.buzz.clamp(0.0, 100.0)) * 0.15
        + if inputs.specialization == Specialization::Blockbuster {
            3.0
        } else {
            0.0
        }
        + audience_noise;
    let critical_score = critical.clamp(0.0, 100.0) as f32;
    let audience_score = audience.clamp(0.0, 100.0) as f32;

    let awards_nominations = if critical_score >= 75.0 {
        let base = ((critical_score - 70.0) / 5.0).floor() as u32;
        (base + u32::from(prestige)).min(8)
    } else {
        0
    };
    let win_chance = ((f64::from(critical_score) - 60.0) / 100.0).clamp(0.05, 0.6);
    let awards_wins = (0..awards_nominations)
        .filter(|_| rng.gen::<f64>() < win_chance)
        .count() as u32;

    let was_record_opening = match inputs.prior_record_opening {
        Some(record) => opening_weekend_gross > record,
        None => opening_weekend_gross > Decimal::ZERO,
    };

    tracing::debug!(
        aggregate,
        multiple,
        outcome = %outcome,
        %final_box_office,
        "release simulated"
    );

    Ok(ReleaseRecord {
        released_week: inputs.week,
        opening_weekend_gross,
        final_box_office,
        critical_score,
        audience_score,
        projected_roi: roi,
        awards_nominations,
        awards_wins,
        report: ReleaseReport {
            outcome,
            was_record_opening,
            profit,
            breakdown,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs() -> ReleaseInputs {
        ReleaseInputs {
            week: 20,
            script_quality: 7.0,
            production_quality: 6.0,
            director_power: 6.0,
            cast_power: 6.0,
            production_budget: Decimal::new(10_000_000, 0),
            marketing_budget: Decimal::new(4_000_000, 0),
            buzz: 30.0,
            specialization: Specialization::Balanced,
            episode: 1,
            prior_record_opening: None,
        }
    }

    #[test]
    fn same_seed_same_report() {
        let a = simulate(&inputs(), 7).unwrap();
        let b = simulate(&inputs(), 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let mut i = inputs();
        i.production_budget = Decimal::ZERO;
        assert_eq!(simulate(&i, 1), Err(EconError::InvalidBudget));
    }

    #[test]
    fn profit_is_box_office_minus_cost() {
        let r = simulate(&inputs(), 3).unwrap();
        assert_eq!(
            r.report.profit,
            r.final_box_office - Decimal::new(14_000_000, 0)
        );
        assert!(r.opening_weekend_gross < r.final_box_office);
    }

    #[test]
    fn roi_follows_breakdown_sum() {
        let r = simulate(&inputs(), 11).unwrap();
        let expected = revenue_multiple(r.report.aggregate()) - 1.0;
        assert!((r.projected_roi - expected).abs() < 1e-12);
        assert_eq!(r.report.outcome, outcome_for_roi(r.projected_roi));
        let noise = r.report.contribution(PerformanceDriver::MarketNoise);
        assert!(noise.abs() <= NOISE_BOUND);
    }

    #[test]
    fn roi_thresholds() {
        assert_eq!(outcome_for_roi(2.0), OutcomeCategory::Blockbuster);
        assert_eq!(outcome_for_roi(1.99), OutcomeCategory::Hit);
        assert_eq!(outcome_for_roi(0.75), OutcomeCategory::Hit);
        assert_eq!(outcome_for_roi(0.1), OutcomeCategory::Solid);
        assert_eq!(outcome_for_roi(0.0), OutcomeCategory::Flop);
        assert_eq!(outcome_for_roi(-0.5), OutcomeCategory::Flop);
        assert_eq!(outcome_for_roi(-0.51), OutcomeCategory::Bomb);
    }

    #[test]
    fn record_opening_compares_against_prior_best() {
        let first = simulate(&inputs(), 5).unwrap();
        assert!(first.report.was_record_opening);
        let mut i = inputs();
        i.prior_record_opening = Some(first.opening_weekend_gross);
        let same = simulate(&i, 5).unwrap();
        assert!(!same.report.was_record_opening);
        i.prior_record_opening = Some(first.opening_weekend_gross - Decimal::ONE);
        assert!(simulate(&i, 5).unwrap().report.was_record_opening);
    }

    #[test]
    fn no_marketing_is_penalised() {
        let mut i = inputs();
        i.marketing_budget = Decimal::ZERO;
        let map = driver_contributions(&i).unwrap();
        assert_eq!(map[&PerformanceDriver::MarketingSpend], -0.8);
    }

    proptest! {
        #[test]
        fn better_script_never_lowers_outcome(seed in 0u64..10_000, q in 0.0f32..9.0, bump in 0.01f32..1.0) {
            let mut low = inputs();
            low.script_quality = q;
            let mut high = low.clone();
            high.script_quality = q + bump;
            let a = simulate(&low, seed).unwrap();
            let b = simulate(&high, seed).unwrap();
            prop_assert!(b.report.aggregate() > a.report.aggregate());
            prop_assert!(b.report.outcome >= a.report.outcome);
            prop_assert!(b.final_box_office >= a.final_box_office);
        }

        #[test]
        fn higher_aggregate_never_lower_outcome(seed_a in 0u64..5_000, seed_b in 0u64..5_000,
                                                qa in 0.0f32..10.0, qb in 0.0f32..10.0) {
            let mut ia = inputs();
            ia.script_quality = qa;
            let mut ib = inputs();
            ib.script_quality = qb;
            let a = simulate(&ia, seed_a).unwrap();
            let b = simulate(&ib, seed_b).unwrap();
            if a.report.aggregate() > b.report.aggregate() {
                prop_assert!(a.report.outcome >= b.report.outcome);
            }
        }

        #[test]
        fn scores_stay_in_range(seed in 0u64..10_000, q in 0.0f32..=10.0, pq in 0.0f32..=10.0) {
            let mut i = inputs();
            i.script_quality = q;
            i.production_quality = pq;
            let r = simulate(&i, seed).unwrap();
            prop_assert!((0.0..=100.0).contains(&r.critical_score));
            prop_assert!((0.0..=100.0).contains(&r.audience_score));
            prop_assert!(r.awards_wins <= r.awards_nominations);
        }
    }
}
