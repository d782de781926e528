//! Timed decisions: generation, resolution and expiry.

use super::*;
use crate::outcome::{DecisionResolution, ExpiredDecision};
use rand::Rng;
use studio_core::{DecisionId, DecisionOption, OptionId};
use tracing::debug;

impl StudioManager {
    /// Answer a queued decision.
    pub fn resolve_decision(
        &mut self,
        decision_id: &DecisionId,
        option_id: &OptionId,
    ) -> Result<DecisionResolution, ActionError> {
        self.guard(ActionKind::ResolveDecision)?;
        let index = self
            .state
            .decision_queue
            .iter()
            .position(|d| &d.id == decision_id)
            .ok_or_else(|| ActionError::UnknownDecision(decision_id.clone()))?;
        let option = self.state.decision_queue[index]
            .option(option_id)
            .cloned()
            .ok_or_else(|| ActionError::UnknownOption {
                event: decision_id.to_string(),
                option: option_id.clone(),
            })?;

        self.state.decision_queue.remove(index);
        self.apply_decision_option(&option);
        self.check_solvency();
        info!(decision = %decision_id, option = %option_id, "decision resolved");
        Ok(DecisionResolution {
            decision: decision_id.clone(),
            option: option.id,
            cash_delta: option.cash_delta,
            heat_delta: option.heat_delta,
        })
    }

    fn apply_decision_option(&mut self, option: &DecisionOption) {
        self.state.ledger.apply_delta(option.cash_delta);
        self.adjust_heat(option.heat_delta);
    }

    /// Tick every queued decision down one week. Items that reach zero apply
    /// their default option, or are dropped when they have none.
    pub(super) fn expire_decisions(&mut self) -> Vec<ExpiredDecision> {
        for item in &mut self.state.decision_queue {
            item.weeks_until_expiry -= 1;
        }
        let (expired, kept): (Vec<DecisionItem>, Vec<DecisionItem>) =
            std::mem::take(&mut self.state.decision_queue)
                .into_iter()
                .partition(|d| d.weeks_until_expiry <= 0);
        self.state.decision_queue = kept;

        let mut report = Vec::with_capacity(expired.len());
        for item in expired {
            let default = item
                .default_option
                .as_ref()
                .and_then(|id| item.option(id))
                .cloned();
            if let Some(option) = &default {
                self.apply_decision_option(option);
            }
            info!(decision = %item.id, applied = ?default.as_ref().map(|o| &o.id), "decision expired");
            report.push(ExpiredDecision {
                decision: item.id,
                applied: default.map(|o| o.id),
            });
        }
        report
    }

    pub(super) fn roll_decisions(&mut self) -> Vec<DecisionId> {
        if self.content.decisions.is_empty() {
            return Vec::new();
        }
        let roll: f64 = self.rng.gen();
        debug!(chance = self.config.decision_chance, roll, "decision roll");
        if roll >= self.config.decision_chance {
            return Vec::new();
        }
        let template = self.rng.gen_range(0..self.content.decisions.len());
        let id = DecisionId::new(self.state.mint_id("decision"));
        let item = self.content.decisions[template].instantiate(id.clone());
        info!(decision = %id, title = %item.title, "decision queued");
        self.state.decision_queue.push(item);
        vec![id]
    }
}
