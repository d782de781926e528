//! Success payloads of studio actions. Each carries a player-facing
//! `message()`.

use rust_decimal::Decimal;
use serde::Serialize;
use studio_core::{
    ArcKind, CrisisId, DealId, DecisionId, OptionId, OutcomeCategory, PartnerId, Phase, ProjectId,
    ScriptId, TalentId, TalentRole, Tier,
};

/// A decision that ran out of time during `end_week`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpiredDecision {
    pub decision: DecisionId,
    /// Default option applied, if the item had one.
    pub applied: Option<OptionId>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeekReport {
    /// The week that just began.
    pub week: u32,
    pub burn: Decimal,
    pub cash: Decimal,
    pub expired_decisions: Vec<ExpiredDecision>,
    pub new_crises: Vec<CrisisId>,
    pub new_decisions: Vec<DecisionId>,
    pub arcs_resolved: Vec<ArcKind>,
    pub tier_change: Option<Tier>,
    pub went_bankrupt: bool,
}

impl WeekReport {
    pub fn message(&self) -> String {
        let mut msg = format!("Week {} begins. Overhead ${} paid.", self.week, self.burn);
        if !self.new_crises.is_empty() {
            msg.push_str(&format!(" {} new crisis(es) need attention.", self.new_crises.len()));
        }
        if let Some(tier) = self.tier_change {
            msg.push_str(&format!(" The studio is now a {tier}."));
        }
        if self.went_bankrupt {
            msg.push_str(" The studio has gone bankrupt.");
        }
        msg
    }
}

/// Headline numbers of a release, repeated from the project's record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReleaseSummary {
    pub outcome: OutcomeCategory,
    pub opening_weekend_gross: Decimal,
    pub final_box_office: Decimal,
    pub profit: Decimal,
    pub was_record_opening: bool,
    pub tier_change: Option<Tier>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhaseAdvance {
    pub project: ProjectId,
    pub from: Phase,
    pub to: Phase,
    pub release: Option<ReleaseSummary>,
}

impl PhaseAdvance {
    pub fn message(&self) -> String {
        match &self.release {
            Some(r) => format!(
                "{} released: ${} total, a {}.",
                self.project, r.final_box_office, r.outcome
            ),
            None => format!("{} moves from {} to {}.", self.project, self.from, self.to),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrisisResolution {
    pub crisis: CrisisId,
    pub option: OptionId,
    pub project: Option<ProjectId>,
    pub cash_delta: Decimal,
    pub schedule_delta: i32,
    pub quality_delta: f32,
    pub arc_started: Option<ArcKind>,
}

impl CrisisResolution {
    pub fn message(&self) -> String {
        let mut msg = format!("Crisis handled ({}).", self.option);
        if self.schedule_delta != 0 {
            msg.push_str(&format!(" Schedule moves {:+} week(s).", self.schedule_delta));
        }
        if let Some(arc) = self.arc_started {
            msg.push_str(&format!(" The story isn't over: {arc}."));
        }
        msg
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecisionResolution {
    pub decision: DecisionId,
    pub option: OptionId,
    pub cash_delta: Decimal,
    pub heat_delta: f32,
}

impl DecisionResolution {
    pub fn message(&self) -> String {
        format!(
            "Decision made ({}): cash {:+}, heat {:+.0}.",
            self.option, self.cash_delta, self.heat_delta
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TalentDeal {
    pub project: ProjectId,
    pub talent: TalentId,
    pub role: TalentRole,
    pub fee: Decimal,
}

impl TalentDeal {
    pub fn message(&self) -> String {
        let role = match self.role {
            TalentRole::Director => "director",
            TalentRole::Actor => "cast member",
        };
        format!("{} signs on as {role} of {} for ${}.", self.talent, self.project, self.fee)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScriptDeal {
    pub script: ScriptId,
    pub title: String,
    /// Development project opened for the script; `None` when passed on.
    pub project: Option<ProjectId>,
    pub price: Decimal,
}

impl ScriptDeal {
    pub fn message(&self) -> String {
        match &self.project {
            Some(p) => format!("Acquired '{}' for ${} as {p}.", self.title, self.price),
            None => format!("Passed on '{}'.", self.title),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GreenlightDeal {
    pub project: ProjectId,
    pub budget: Decimal,
}

impl GreenlightDeal {
    pub fn message(&self) -> String {
        format!("{} greenlit with a ${} budget.", self.project, self.budget)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketingSpend {
    pub project: ProjectId,
    pub added: Decimal,
    pub total: Decimal,
}

impl MarketingSpend {
    pub fn message(&self) -> String {
        format!(
            "Marketing for {} raised by ${} to ${}.",
            self.project, self.added, self.total
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReleaseBooking {
    pub project: ProjectId,
    pub partner: PartnerId,
    pub window: DealId,
    pub week: u32,
    pub fee: Decimal,
}

impl ReleaseBooking {
    pub fn message(&self) -> String {
        format!(
            "{} booked with {} for week {} (fee ${}).",
            self.project, self.partner, self.week, self.fee
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SequelStart {
    pub parent: ProjectId,
    pub project: ProjectId,
    pub episode: u32,
    pub upfront_cost: Decimal,
    pub carryover_hype: f32,
}

impl SequelStart {
    pub fn message(&self) -> String {
        format!(
            "Episode {} of {} opens as {} (${} upfront).",
            self.episode, self.parent, self.project, self.upfront_cost
        )
    }
}

/// Actions that never advance time and are never blocked by crises.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum OptionalAction {
    /// Paid press tour for a picture.
    PressPush { project: ProjectId },
    /// Festival screening; only for finished cuts.
    FestivalRun { project: ProjectId },
}

impl OptionalAction {
    pub fn project(&self) -> &ProjectId {
        match self {
            OptionalAction::PressPush { project } | OptionalAction::FestivalRun { project } => {
                project
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionalOutcome {
    pub action: OptionalAction,
    pub cost: Decimal,
    pub buzz_delta: f32,
    pub heat_delta: f32,
    /// Jury result for festival runs.
    pub festival_win: Option<bool>,
}

impl OptionalOutcome {
    pub fn message(&self) -> String {
        match (&self.action, self.festival_win) {
            (OptionalAction::FestivalRun { project }, Some(true)) => {
                format!("{project} took the jury prize. Buzz {:+.0}.", self.buzz_delta)
            }
            (OptionalAction::FestivalRun { project }, _) => {
                format!("{project} screened to a polite reception. Buzz {:+.0}.", self.buzz_delta)
            }
            (OptionalAction::PressPush { project }, _) => {
                format!("Press tour for {project}. Buzz {:+.0}.", self.buzz_delta)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_message_mentions_crises_and_tier() {
        let report = WeekReport {
            week: 5,
            burn: Decimal::new(40_000, 0),
            cash: Decimal::new(1_000_000, 0),
            expired_decisions: vec![],
            new_crises: vec![CrisisId::from("crisis-3")],
            new_decisions: vec![],
            arcs_resolved: vec![],
            tier_change: Some(Tier::EstablishedIndie),
            went_bankrupt: false,
        };
        let msg = report.message();
        assert!(msg.starts_with("Week 5 begins"));
        assert!(msg.contains("1 new crisis"));
        assert!(msg.contains("Established Indie"));
    }
}
