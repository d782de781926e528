//! Narrative arcs and partner relationships.

use crate::ids::{PartnerId, ProjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed catalog of story threads the studio can get caught up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArcKind {
    AwardsCircuit,
    ExhibitorPowerPlay,
    ExhibitorWar,
    FinancierControl,
    FranchisePivot,
    LeakPiracy,
    TalentMeltdown,
    PassionProject,
}

impl ArcKind {
    pub fn key(self) -> &'static str {
        match self {
            ArcKind::AwardsCircuit => "awards-circuit",
            ArcKind::ExhibitorPowerPlay => "exhibitor-power-play",
            ArcKind::ExhibitorWar => "exhibitor-war",
            ArcKind::FinancierControl => "financier-control",
            ArcKind::FranchisePivot => "franchise-pivot",
            ArcKind::LeakPiracy => "leak-piracy",
            ArcKind::TalentMeltdown => "talent-meltdown",
            ArcKind::PassionProject => "passion-project",
        }
    }
}

impl fmt::Display for ArcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArcState {
    Active,
    Resolved,
}

/// What an arc is about: a project, a partner, or the studio as a whole.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArcSubject {
    Studio,
    Project(ProjectId),
    Partner(PartnerId),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NarrativeArc {
    pub kind: ArcKind,
    pub state: ArcState,
    pub subject: ArcSubject,
    pub started_week: u32,
    pub resolved_week: Option<u32>,
}

impl NarrativeArc {
    pub fn is_active(&self) -> bool {
        self.state == ArcState::Active
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartnerKind {
    Exhibitor,
    Financier,
    Distributor,
}

/// Relationship posture. Ordered from worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stance {
    Hostile,
    Competitive,
    Neutral,
    Respectful,
}

impl Stance {
    pub fn improved(self) -> Stance {
        match self {
            Stance::Hostile => Stance::Competitive,
            Stance::Competitive => Stance::Neutral,
            Stance::Neutral | Stance::Respectful => Stance::Respectful,
        }
    }

    pub fn degraded(self) -> Stance {
        match self {
            Stance::Respectful => Stance::Neutral,
            Stance::Neutral => Stance::Competitive,
            Stance::Competitive | Stance::Hostile => Stance::Hostile,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub kind: PartnerKind,
    pub stance: Stance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stance_steps_saturate() {
        assert_eq!(Stance::Hostile.degraded(), Stance::Hostile);
        assert_eq!(Stance::Respectful.improved(), Stance::Respectful);
        assert_eq!(Stance::Neutral.degraded(), Stance::Competitive);
        assert_eq!(Stance::Competitive.improved(), Stance::Neutral);
        assert!(Stance::Hostile < Stance::Respectful);
    }

    #[test]
    fn arc_keys_are_kebab_case() {
        assert_eq!(ArcKind::ExhibitorPowerPlay.to_string(), "exhibitor-power-play");
        assert_eq!(ArcKind::LeakPiracy.key(), "leak-piracy");
    }
}
