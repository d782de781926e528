//! Studio tier ladder and strategic specialization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Studio rank. Only ever moves upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    IndieStudio,
    EstablishedIndie,
    MidTier,
    MajorStudio,
    GlobalPowerhouse,
}

/// Requirement to enter a tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierGate {
    pub min_releases: u32,
    pub min_heat: f32,
}

impl TierGate {
    pub fn is_met(&self, releases: u32, heat: f32) -> bool {
        releases >= self.min_releases && heat >= self.min_heat
    }
}

impl Tier {
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::IndieStudio => Some(Tier::EstablishedIndie),
            Tier::EstablishedIndie => Some(Tier::MidTier),
            Tier::MidTier => Some(Tier::MajorStudio),
            Tier::MajorStudio => Some(Tier::GlobalPowerhouse),
            Tier::GlobalPowerhouse => None,
        }
    }

    /// Gate that must be met to enter this tier. The starting tier has none.
    pub fn entry_gate(self) -> Option<TierGate> {
        let (min_releases, min_heat) = match self {
            Tier::IndieStudio => return None,
            Tier::EstablishedIndie => (2, 20.0),
            Tier::MidTier => (5, 35.0),
            Tier::MajorStudio => (9, 55.0),
            Tier::GlobalPowerhouse => (15, 75.0),
        };
        Some(TierGate {
            min_releases,
            min_heat,
        })
    }

    /// Weekly fixed costs of running a studio of this size.
    pub fn weekly_overhead(self) -> Decimal {
        match self {
            Tier::IndieStudio => Decimal::new(40_000, 0),
            Tier::EstablishedIndie => Decimal::new(90_000, 0),
            Tier::MidTier => Decimal::new(200_000, 0),
            Tier::MajorStudio => Decimal::new(450_000, 0),
            Tier::GlobalPowerhouse => Decimal::new(900_000, 0),
        }
    }

    /// Premium talent agents charge a studio of this size, as a fraction.
    pub fn fee_premium(self) -> f64 {
        match self {
            Tier::IndieStudio => 0.0,
            Tier::EstablishedIndie => 0.05,
            Tier::MidTier => 0.10,
            Tier::MajorStudio => 0.20,
            Tier::GlobalPowerhouse => 0.30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::IndieStudio => "Indie Studio",
            Tier::EstablishedIndie => "Established Indie",
            Tier::MidTier => "Mid-Tier",
            Tier::MajorStudio => "Major Studio",
            Tier::GlobalPowerhouse => "Global Powerhouse",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Strategic leaning that weights the release model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    #[default]
    Balanced,
    Blockbuster,
    Prestige,
    Indie,
}

impl Specialization {
    /// Multiplier applied to weekly overhead.
    pub fn burn_factor(self) -> Decimal {
        match self {
            Specialization::Indie => Decimal::new(8, 1),
            Specialization::Balanced | Specialization::Blockbuster | Specialization::Prestige => {
                Decimal::ONE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_tighten_up_the_ladder() {
        let mut tier = Tier::IndieStudio;
        let mut last = TierGate {
            min_releases: 0,
            min_heat: 0.0,
        };
        assert!(tier.entry_gate().is_none());
        while let Some(next) = tier.next() {
            let gate = next.entry_gate().expect("non-initial tiers have gates");
            assert!(gate.min_releases > last.min_releases);
            assert!(gate.min_heat > last.min_heat);
            assert!(next.weekly_overhead() > tier.weekly_overhead());
            last = gate;
            tier = next;
        }
        assert_eq!(tier, Tier::GlobalPowerhouse);
    }

    #[test]
    fn gate_is_inclusive() {
        let gate = Tier::EstablishedIndie.entry_gate().unwrap();
        assert!(gate.is_met(2, 20.0));
        assert!(!gate.is_met(1, 99.0));
        assert!(!gate.is_met(2, 19.9));
    }
}
