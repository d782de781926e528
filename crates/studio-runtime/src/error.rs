//! Rejections returned by studio actions.
//!
//! Every action either succeeds with a typed payload or fails with an
//! [`ActionError`] and leaves the studio untouched.

use rust_decimal::Decimal;
use std::fmt;
use studio_core::{
    CrisisId, DecisionId, OptionId, PartnerId, Phase, ProjectId, ScriptId, TalentId,
    ValidationError,
};
use studio_econ::EconError;
use thiserror::Error;

/// One unmet condition on a phase transition. `Display` is player-facing.
#[derive(Clone, Debug, PartialEq)]
pub enum PhaseBlocker {
    DirectorNotAttached,
    /// Production needs at least one actor.
    NoCast,
    ScriptQualityTooLow { minimum: f32 },
    NotGreenlit,
    WorkRemaining { weeks: u32 },
    UnresolvedCrises { count: usize },
    NoMarketing,
    NoReleaseWindow,
    ReleaseWeekNotReached { release_week: u32, current: u32 },
    /// Released projects have no further phase.
    AlreadyReleased,
}

impl fmt::Display for PhaseBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseBlocker::DirectorNotAttached => f.write_str("Director not attached"),
            PhaseBlocker::NoCast => f.write_str("No cast attached"),
            PhaseBlocker::ScriptQualityTooLow { minimum } => {
                write!(f, "Script quality below {minimum:.1}")
            }
            PhaseBlocker::NotGreenlit => f.write_str("Greenlight not approved"),
            PhaseBlocker::WorkRemaining { weeks: 1 } => f.write_str("1 week of work remaining"),
            PhaseBlocker::WorkRemaining { weeks } => write!(f, "{weeks} weeks of work remaining"),
            PhaseBlocker::UnresolvedCrises { count } => {
                write!(f, "{count} unresolved crisis(es) on set")
            }
            PhaseBlocker::NoMarketing => f.write_str("Marketing budget not set"),
            PhaseBlocker::NoReleaseWindow => f.write_str("Release window not booked"),
            PhaseBlocker::ReleaseWeekNotReached {
                release_week,
                current,
            } => write!(f, "Release week {release_week} not reached (week {current})"),
            PhaseBlocker::AlreadyReleased => f.write_str("Project already released"),
        }
    }
}

fn join_blockers(blockers: &[PhaseBlocker]) -> String {
    blockers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a studio action was refused. The studio is unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    /// The studio went under and the action is not exempt.
    #[error("studio is bankrupt: {reason}")]
    Bankrupt { reason: String },
    /// The week cannot end while crises are pending.
    #[error("{count} crisis(es) must be resolved before the week can end")]
    CrisesPending { count: usize },
    #[error("unknown project {0}")]
    UnknownProject(ProjectId),
    #[error("unknown talent {0}")]
    UnknownTalent(TalentId),
    /// The script was never offered, or was already bought or passed.
    #[error("script {0} is not on the market")]
    UnknownScript(ScriptId),
    #[error("unknown partner {0}")]
    UnknownPartner(PartnerId),
    /// No such crisis is pending; it may already be resolved.
    #[error("no pending crisis {0}")]
    UnknownCrisis(CrisisId),
    /// No such decision is queued; it may have expired.
    #[error("no queued decision {0}")]
    UnknownDecision(DecisionId),
    /// The crisis or decision has no option with that id.
    #[error("{event} has no option {option}")]
    UnknownOption { event: String, option: OptionId },
    /// The project is in the wrong phase for the action.
    #[error("{project} is in {phase}, which does not allow this")]
    WrongPhase { project: ProjectId, phase: Phase },
    /// Paying would take cash below zero.
    #[error("insufficient funds: need ${needed}, have ${available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    /// The talent is already working on another project.
    #[error("{talent} is committed to {project}")]
    TalentCommitted { talent: TalentId, project: ProjectId },
    /// Stars only sign with studios hot enough for them.
    #[error("{talent} wants a studio with heat {required:.0} (currently {heat:.0})")]
    HeatTooLow {
        talent: TalentId,
        required: f32,
        heat: f32,
    },
    #[error("{0} already has a director")]
    DirectorSlotTaken(ProjectId),
    #[error("{talent} is already attached to {project}")]
    AlreadyAttached { talent: TalentId, project: ProjectId },
    /// The cast is at the configured cap.
    #[error("cast is full ({max} actors)")]
    CastFull { max: usize },
    #[error("{0} is already greenlit")]
    AlreadyGreenlit(ProjectId),
    /// The phase change is blocked. Every unmet condition is listed.
    #[error("cannot advance: {}", join_blockers(.blockers))]
    PhaseBlocked { blockers: Vec<PhaseBlocker> },
    /// Hostile partners and financiers will not book releases.
    #[error("{partner} refuses the deal: {reason}")]
    PartnerRefused { partner: PartnerId, reason: String },
    #[error("release week {week} has already passed (now week {current})")]
    ReleaseWeekPassed { week: u32, current: u32 },
    /// The parent project is not eligible for a sequel; carries the reasons.
    #[error("no sequel possible: {0}")]
    SequelIneligible(String),
    #[error("amount must be positive")]
    InvalidAmount,
    /// The release model rejected its inputs.
    #[error("release model failed: {0}")]
    Release(#[from] EconError),
}

impl ActionError {
    /// Player-facing text.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Blockers for a refused phase change, empty for other rejections.
    pub fn blockers(&self) -> &[PhaseBlocker] {
        match self {
            ActionError::PhaseBlocked { blockers } => blockers,
            _ => &[],
        }
    }
}

/// Why a snapshot could not be turned back into a studio.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("snapshot failed validation: {0}")]
    Invalid(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocker_text_is_player_facing() {
        assert_eq!(PhaseBlocker::DirectorNotAttached.to_string(), "Director not attached");
        assert_eq!(
            PhaseBlocker::ScriptQualityTooLow { minimum: 6.0 }.to_string(),
            "Script quality below 6.0"
        );
        assert_eq!(
            PhaseBlocker::WorkRemaining { weeks: 3 }.to_string(),
            "3 weeks of work remaining"
        );
        let err = ActionError::PhaseBlocked {
            blockers: vec![PhaseBlocker::DirectorNotAttached, PhaseBlocker::NoCast],
        };
        assert_eq!(
            err.message(),
            "cannot advance: Director not attached; No cast attached"
        );
        assert_eq!(err.blockers().len(), 2);
    }
}
