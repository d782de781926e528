//! Project phase machine and the release that ends it.

use super::progression::ArcTrigger;
use super::*;
use crate::error::PhaseBlocker;
use crate::outcome::{PhaseAdvance, ReleaseSummary};
use rand::Rng;
use studio_core::{OutcomeCategory, PartnerId, Phase};
use studio_econ::ReleaseInputs;
use tracing::debug;

impl StudioManager {
    /// Unmet conditions for moving `project_id` into its next phase.
    pub fn phase_blockers(&self, project_id: &ProjectId) -> Result<Vec<PhaseBlocker>, ActionError> {
        Ok(self.gate_blockers(self.find_project(project_id)?))
    }

    fn gate_blockers(&self, project: &MovieProject) -> Vec<PhaseBlocker> {
        let mut blockers = Vec::new();
        if project.phase == Phase::Development {
            if project.director_id.is_none() {
                blockers.push(PhaseBlocker::DirectorNotAttached);
            }
            if project.cast_ids.is_empty() {
                blockers.push(PhaseBlocker::NoCast);
            }
            if project.script_quality < self.config.min_script_quality {
                blockers.push(PhaseBlocker::ScriptQualityTooLow {
                    minimum: self.config.min_script_quality,
                });
            }
            if !project.greenlight_approved {
                blockers.push(PhaseBlocker::NotGreenlit);
            }
            return blockers;
        }
        if project.phase == Phase::Released {
            blockers.push(PhaseBlocker::AlreadyReleased);
            return blockers;
        }

        if project.scheduled_weeks_remaining > 0 {
            blockers.push(PhaseBlocker::WorkRemaining {
                weeks: project.scheduled_weeks_remaining,
            });
        }
        match project.phase {
            Phase::Production => {
                let count = self.state.crises_for(&project.id);
                if count > 0 {
                    blockers.push(PhaseBlocker::UnresolvedCrises { count });
                }
            }
            Phase::PostProduction => {
                if project.marketing_budget <= Decimal::ZERO {
                    blockers.push(PhaseBlocker::NoMarketing);
                }
            }
            Phase::Distribution => match (&project.release_window, project.release_week) {
                (Some(_), Some(release_week)) if release_week > self.state.week => {
                    blockers.push(PhaseBlocker::ReleaseWeekNotReached {
                        release_week,
                        current: self.state.week,
                    });
                }
                (Some(_), Some(_)) => {}
                _ => blockers.push(PhaseBlocker::NoReleaseWindow),
            },
            _ => {}
        }
        blockers
    }

    /// Move a project into its next phase, or report every unmet condition.
    /// Entering `Released` runs the release simulation.
    pub fn advance_project_phase(
        &mut self,
        project_id: &ProjectId,
    ) -> Result<PhaseAdvance, ActionError> {
        self.guard(ActionKind::AdvancePhase)?;
        let project = self.find_project(project_id)?;
        let blockers = self.gate_blockers(project);
        if !blockers.is_empty() {
            debug!(project = %project_id, ?blockers, "phase change refused");
            return Err(ActionError::PhaseBlocked { blockers });
        }
        let from = project.phase;
        let to = from.next().ok_or_else(|| ActionError::PhaseBlocked {
            blockers: vec![PhaseBlocker::AlreadyReleased],
        })?;

        if to == Phase::Released {
            let summary = self.release(project_id)?;
            return Ok(PhaseAdvance {
                project: project_id.clone(),
                from,
                to,
                release: Some(summary),
            });
        }

        let weeks = self.config.phase_weeks(to);
        if let Some(project) = self.state.project_mut(project_id) {
            project.phase = to;
            project.scheduled_weeks_remaining = weeks;
        }
        info!(project = %project_id, %from, %to, weeks, "phase advanced");
        Ok(PhaseAdvance {
            project: project_id.clone(),
            from,
            to,
            release: None,
        })
    }

    fn release_inputs(&self, project: &MovieProject) -> ReleaseInputs {
        let director_power = project
            .director_id
            .as_ref()
            .and_then(|id| self.state.talent(id))
            .map(|t| t.power)
            .unwrap_or(0.0);
        let cast: Vec<f32> = project
            .cast_ids
            .iter()
            .filter_map(|id| self.state.talent(id))
            .map(|t| t.power)
            .collect();
        let cast_power = if cast.is_empty() {
            0.0
        } else {
            cast.iter().sum::<f32>() / cast.len() as f32
        };
        ReleaseInputs {
            week: self.state.week,
            script_quality: project.script_quality,
            production_quality: project.production_quality,
            director_power,
            cast_power,
            production_budget: project.production_budget,
            marketing_budget: project.marketing_budget,
            buzz: project.buzz,
            specialization: self.state.specialization,
            episode: project.episode(),
            prior_record_opening: self.state.record_opening,
        }
    }

    fn release(&mut self, project_id: &ProjectId) -> Result<ReleaseSummary, ActionError> {
        let inputs = self.release_inputs(self.find_project(project_id)?);
        // Draw on a copy so a failed simulation leaves the stream untouched.
        let mut rng = self.rng.clone();
        let record = studio_econ::simulate(&inputs, rng.gen())?;
        self.rng = rng;

        let project = self
            .state
            .project_mut(project_id)
            .ok_or_else(|| ActionError::UnknownProject(project_id.clone()))?;
        project.phase = Phase::Released;
        project.scheduled_weeks_remaining = 0;
        project.release = Some(record.clone());
        let title = project.title.clone();
        let distributor = project.distributor.clone();

        self.state.ledger.credit(record.final_box_office);
        for talent in self
            .state
            .talent
            .iter_mut()
            .filter(|t| t.committed_to.as_ref() == Some(project_id))
        {
            talent.committed_to = None;
        }
        self.state.releases += 1;
        let report = &record.report;
        if report.was_record_opening {
            self.state.record_opening = Some(record.opening_weekend_gross);
        }
        self.adjust_heat(report.outcome.heat_delta());

        let mut description = format!(
            "'{title}' opened to ${} and finished at ${}, a {}",
            record.opening_weekend_gross, record.final_box_office, report.outcome
        );
        if report.was_record_opening {
            description.push_str(". A studio record opening");
        }
        self.record(ChronicleCategory::FilmRelease, description);
        if record.awards_nominations > 0 {
            self.record(
                ChronicleCategory::AwardsOutcome,
                format!(
                    "'{title}' earned {} nomination(s) and {} win(s)",
                    record.awards_nominations, record.awards_wins
                ),
            );
        }
        info!(
            project = %project_id,
            outcome = %report.outcome,
            box_office = %record.final_box_office,
            profit = %report.profit,
            "film released"
        );

        self.process_arcs(ArcTrigger::Released {
            project: project_id.clone(),
            outcome: report.outcome,
            critical: record.critical_score,
            partner: distributor.clone(),
        });
        if let Some(partner) = &distributor {
            self.settle_partner(partner, report.outcome);
        }
        let tier_change = self.evaluate_tier();

        Ok(ReleaseSummary {
            outcome: report.outcome,
            opening_weekend_gross: record.opening_weekend_gross,
            final_box_office: record.final_box_office,
            profit: report.profit,
            was_record_opening: report.was_record_opening,
            tier_change,
        })
    }

    /// Deal outcome for the partner that carried a release.
    pub(super) fn settle_partner(&mut self, partner: &PartnerId, outcome: OutcomeCategory) {
        let Some(p) = self.state.partner_mut(partner) else {
            return;
        };
        let next = match outcome {
            OutcomeCategory::Bomb => p.stance.degraded(),
            OutcomeCategory::Hit | OutcomeCategory::Blockbuster => p.stance.improved(),
            OutcomeCategory::Flop | OutcomeCategory::Solid => return,
        };
        if next != p.stance {
            info!(partner = %partner, from = ?p.stance, to = ?next, "partner stance settled");
            p.stance = next;
            self.process_arcs(ArcTrigger::StanceChanged {
                partner: partner.clone(),
            });
        }
    }
}
