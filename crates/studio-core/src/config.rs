//! Tunable parameters for a studio run.

use crate::calendar::default_season_start;
use crate::project::Phase;
use crate::tier::Specialization;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weeks of scheduled work loaded when a project enters each phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub pre_production: u32,
    pub production: u32,
    pub post_production: u32,
    pub distribution: u32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            pre_production: 3,
            production: 6,
            post_production: 4,
            distribution: 2,
        }
    }
}

/// Simulation configuration parameters. Missing YAML keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub studio_name: String,
    /// Seed for the deterministic RNG stream.
    pub rng_seed: u64,
    pub starting_cash: Decimal,
    /// Cash level below which the studio is declared bankrupt.
    pub bankruptcy_floor: Decimal,
    pub specialization: Specialization,
    /// Calendar date of week 1.
    pub season_start: NaiveDate,
    /// Inclusive minimum script quality to leave development.
    pub min_script_quality: f32,
    pub durations: PhaseDurations,
    /// Base weekly chance of a crisis per project in production.
    pub crisis_chance: f64,
    /// Weekly chance of a new decision landing on the desk.
    pub decision_chance: f64,
    pub script_market_size: usize,
    pub max_cast: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            studio_name: "Lantern Pictures".to_string(),
            rng_seed: 42,
            starting_cash: Decimal::new(25_000_000, 0),
            bankruptcy_floor: Decimal::new(-1_000_000, 0),
            specialization: Specialization::Balanced,
            season_start: default_season_start(),
            min_script_quality: 6.0,
            durations: PhaseDurations::default(),
            crisis_chance: 0.12,
            decision_chance: 0.25,
            script_market_size: 4,
            max_cast: 6,
        }
    }
}

impl StudioConfig {
    /// Scheduled weeks loaded on entering `phase`.
    pub fn phase_weeks(&self, phase: Phase) -> u32 {
        match phase {
            Phase::PreProduction => self.durations.pre_production,
            Phase::Production => self.durations.production,
            Phase::PostProduction => self.durations.post_production,
            Phase::Distribution => self.durations.distribution,
            Phase::Development | Phase::Released => 0,
        }
    }
}
