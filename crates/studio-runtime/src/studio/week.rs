//! The weekly turn and the optional actions that fit between turns.

use super::progression::ArcTrigger;
use super::*;
use crate::outcome::{OptionalAction, OptionalOutcome, WeekReport};
use rand::Rng;
use studio_core::Phase;

const PRESS_PUSH_COST: Decimal = Decimal::from_parts(150_000, 0, 0, false, 0);
const FESTIVAL_COST: Decimal = Decimal::from_parts(60_000, 0, 0, false, 0);

impl StudioManager {
    /// Advance simulated time by one week.
    ///
    /// Refused while bankrupt or while any crisis is pending; in both cases
    /// nothing changes.
    pub fn end_week(&mut self) -> Result<WeekReport, ActionError> {
        self.guard(ActionKind::EndWeek)?;
        if !self.state.pending_crises.is_empty() {
            return Err(ActionError::CrisesPending {
                count: self.state.pending_crises.len(),
            });
        }

        let expired_decisions = self.expire_decisions();
        for project in self
            .state
            .projects
            .iter_mut()
            .filter(|p| p.phase.is_scheduled())
        {
            project.scheduled_weeks_remaining = project.scheduled_weeks_remaining.saturating_sub(1);
        }
        self.state.week += 1;

        let burn = (self.state.tier.weekly_overhead() * self.state.specialization.burn_factor())
            .round_dp(0);
        self.state.ledger.apply_burn(burn);
        let went_bankrupt = self.check_solvency();

        let arcs_resolved = self.process_arcs(ArcTrigger::WeekEnded);
        let (new_crises, new_decisions) = if self.is_bankrupt() {
            (Vec::new(), Vec::new())
        } else {
            (self.roll_crises(), self.roll_decisions())
        };
        self.refill_script_market();
        let tier_change = self.evaluate_tier();

        info!(
            week = self.state.week,
            cash = %self.state.cash(),
            %burn,
            crises = new_crises.len(),
            "week ended"
        );
        Ok(WeekReport {
            week: self.state.week,
            burn,
            cash: self.state.cash(),
            expired_decisions,
            new_crises,
            new_decisions,
            arcs_resolved,
            tier_change,
            went_bankrupt,
        })
    }

    /// Run a discretionary action. Never advances time and is not blocked by
    /// pending crises.
    pub fn run_optional_action(
        &mut self,
        action: OptionalAction,
    ) -> Result<OptionalOutcome, ActionError> {
        self.guard(ActionKind::OptionalAction)?;
        let project_id = action.project().clone();
        let project = self.find_project(&project_id)?;
        if project.is_released() {
            return Err(ActionError::WrongPhase {
                project: project_id,
                phase: project.phase,
            });
        }

        match action {
            OptionalAction::PressPush { .. } => {
                self.require_funds(PRESS_PUSH_COST)?;
                self.state.ledger.debit(PRESS_PUSH_COST);
                let buzz_delta = self.bump_buzz(&project_id, 12.0);
                self.adjust_heat(1.0);
                info!(project = %project_id, buzz_delta, "press push");
                Ok(OptionalOutcome {
                    action,
                    cost: PRESS_PUSH_COST,
                    buzz_delta,
                    heat_delta: 1.0,
                    festival_win: None,
                })
            }
            OptionalAction::FestivalRun { .. } => {
                if !matches!(project.phase, Phase::PostProduction | Phase::Distribution) {
                    return Err(ActionError::WrongPhase {
                        project: project_id,
                        phase: project.phase,
                    });
                }
                let title = project.title.clone();
                let merit = f64::from(project.script_quality + project.production_quality) / 20.0;
                self.require_funds(FESTIVAL_COST)?;

                self.state.ledger.debit(FESTIVAL_COST);
                let win_chance = (0.15 + 0.5 * merit).clamp(0.05, 0.8);
                let win = self.rng.gen::<f64>() < win_chance;
                let (buzz, heat_delta) = if win { (15.0, 3.0) } else { (4.0, 0.0) };
                let buzz_delta = self.bump_buzz(&project_id, buzz);
                self.adjust_heat(heat_delta);
                let description = if win {
                    format!("'{title}' took the jury prize on the festival circuit")
                } else {
                    format!("'{title}' screened on the festival circuit to a polite reception")
                };
                self.record(ChronicleCategory::FestivalOutcome, description);
                info!(project = %project_id, win, win_chance, "festival run");
                Ok(OptionalOutcome {
                    action,
                    cost: FESTIVAL_COST,
                    buzz_delta,
                    heat_delta,
                    festival_win: Some(win),
                })
            }
        }
    }

    /// Raise buzz, capped at 100. Returns the change actually applied.
    fn bump_buzz(&mut self, project_id: &ProjectId, amount: f32) -> f32 {
        match self.state.project_mut(project_id) {
            Some(project) => {
                let before = project.buzz;
                project.buzz = (project.buzz + amount).clamp(0.0, 100.0);
                project.buzz - before
            }
            None => 0.0,
        }
    }
}
