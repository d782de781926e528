//! Crisis generation and resolution.

use super::*;
use crate::outcome::CrisisResolution;
use rand::Rng;
use studio_core::{CrisisId, OptionId, Phase};
use tracing::debug;

/// Weekly chance of a crisis on a project in production. Sloppier shoots
/// attract more trouble.
pub fn crisis_chance(base: f64, production_quality: f32) -> f64 {
    (base * (1.5 - f64::from(production_quality) / 10.0)).clamp(0.0, 1.0)
}

impl StudioManager {
    /// Apply the chosen option of a pending crisis and clear it.
    pub fn resolve_crisis(
        &mut self,
        crisis_id: &CrisisId,
        option_id: &OptionId,
    ) -> Result<CrisisResolution, ActionError> {
        self.guard(ActionKind::ResolveCrisis)?;
        let index = self
            .state
            .pending_crises
            .iter()
            .position(|c| &c.id == crisis_id)
            .ok_or_else(|| ActionError::UnknownCrisis(crisis_id.clone()))?;
        let option = self.state.pending_crises[index]
            .option(option_id)
            .cloned()
            .ok_or_else(|| ActionError::UnknownOption {
                event: crisis_id.to_string(),
                option: option_id.clone(),
            })?;

        let crisis = self.state.pending_crises.remove(index);
        self.state.ledger.apply_delta(option.cash_delta);
        if let Some(project) = crisis
            .project_id
            .as_ref()
            .and_then(|id| self.state.project_mut(id))
        {
            let weeks = i64::from(project.scheduled_weeks_remaining) + i64::from(option.schedule_delta);
            project.scheduled_weeks_remaining = u32::try_from(weeks.max(0)).unwrap_or(u32::MAX);
            project.production_quality =
                (project.production_quality + option.quality_delta).clamp(0.0, 10.0);
        }
        self.record(
            ChronicleCategory::CrisisResolved,
            format!("{}: {}", crisis.title, option.label),
        );
        let arc_started = match (crisis.arc_hook, &crisis.project_id) {
            (Some(kind), Some(project)) => self
                .start_arc(kind, ArcSubject::Project(project.clone()))
                .then_some(kind),
            _ => None,
        };
        self.check_solvency();
        info!(crisis = %crisis_id, option = %option_id, cash = %self.state.cash(), "crisis resolved");

        Ok(CrisisResolution {
            crisis: crisis.id,
            option: option.id,
            project: crisis.project_id,
            cash_delta: option.cash_delta,
            schedule_delta: option.schedule_delta,
            quality_delta: option.quality_delta,
            arc_started,
        })
    }

    /// Roll for new crises on every project shooting this week. A project
    /// carries at most one pending crisis.
    pub(super) fn roll_crises(&mut self) -> Vec<CrisisId> {
        if self.content.crises.is_empty() {
            return Vec::new();
        }
        let candidates: Vec<(ProjectId, f32)> = self
            .state
            .projects
            .iter()
            .filter(|p| p.phase == Phase::Production && self.state.crises_for(&p.id) == 0)
            .map(|p| (p.id.clone(), p.production_quality))
            .collect();

        let mut raised = Vec::new();
        for (project, quality) in candidates {
            let chance = crisis_chance(self.config.crisis_chance, quality);
            let roll: f64 = self.rng.gen();
            debug!(project = %project, chance, roll, "crisis roll");
            if roll >= chance {
                continue;
            }
            let template = self.rng.gen_range(0..self.content.crises.len());
            let id = CrisisId::new(self.state.mint_id("crisis"));
            let crisis =
                self.content.crises[template].instantiate(id.clone(), Some(project), self.state.week);
            info!(crisis = %id, title = %crisis.title, "crisis raised");
            self.state.pending_crises.push(crisis);
            raised.push(id);
        }
        raised
    }
}

#[cfg(test)]
mod tests {
    use super::crisis_chance;

    #[test]
    fn chance_scales_with_production_quality() {
        assert!((crisis_chance(0.1, 10.0) - 0.05).abs() < 1e-9);
        assert!((crisis_chance(0.1, 0.0) - 0.15).abs() < 1e-9);
        assert_eq!(crisis_chance(1.0, 0.0), 1.0);
        assert!(crisis_chance(0.2, 4.0) > crisis_chance(0.2, 8.0));
    }
}
