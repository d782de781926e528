//! Headless play: one call plays one full turn.

use crate::{choose_crisis_option, choose_decision_option, AutopilotPolicy};
use rust_decimal::Decimal;
use serde::Serialize;
use studio_core::{PartnerId, PartnerKind, Phase, ProjectId, ScriptId, Stance, TalentId, TalentRole};
use studio_econ::{quote_fee, required_heat};
use studio_runtime::{ActionError, ReleaseSummary, Session, StudioManager, WeekReport};
use tracing::{debug, info};

/// Anything the autopilot can read a studio from and run actions through.
pub trait StudioDriver {
    fn studio(&self) -> &StudioManager;

    fn apply<T, F>(&mut self, action: F) -> Result<T, ActionError>
    where
        F: FnOnce(&mut StudioManager) -> Result<T, ActionError>;
}

impl StudioDriver for StudioManager {
    fn studio(&self) -> &StudioManager {
        self
    }

    fn apply<T, F>(&mut self, action: F) -> Result<T, ActionError>
    where
        F: FnOnce(&mut StudioManager) -> Result<T, ActionError>,
    {
        action(self)
    }
}

impl StudioDriver for Session {
    fn studio(&self) -> &StudioManager {
        Session::studio(self)
    }

    fn apply<T, F>(&mut self, action: F) -> Result<T, ActionError>
    where
        F: FnOnce(&mut StudioManager) -> Result<T, ActionError>,
    {
        self.act(action)
    }
}

/// What happened during one autopilot turn.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TurnSummary {
    pub crises_resolved: usize,
    pub decisions_resolved: usize,
    /// Player-facing messages of every deal struck.
    pub deals: Vec<String>,
    pub releases: Vec<ReleaseSummary>,
    pub report: Option<WeekReport>,
    /// Why the week could not end, if it didn't.
    pub stalled: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Autopilot {
    policy: AutopilotPolicy,
}

impl Autopilot {
    pub fn new(policy: AutopilotPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AutopilotPolicy {
        &self.policy
    }

    /// Play up to `weeks` turns, stopping early once the week stops
    /// advancing.
    pub fn play<D: StudioDriver>(&self, driver: &mut D, weeks: u32) -> Vec<TurnSummary> {
        let mut turns = Vec::with_capacity(weeks as usize);
        for _ in 0..weeks {
            let turn = self.play_week(driver);
            let stalled = turn.report.is_none();
            turns.push(turn);
            if stalled {
                break;
            }
        }
        turns
    }

    /// Settle the desk, tend the slate, shop for scripts, then end the week.
    pub fn play_week<D: StudioDriver>(&self, driver: &mut D) -> TurnSummary {
        let mut turn = TurnSummary::default();
        if let Some(bankruptcy) = driver.studio().bankruptcy() {
            turn.stalled = Some(bankruptcy.reason.clone());
            return turn;
        }

        self.settle_crises(driver, &mut turn);
        self.settle_decisions(driver, &mut turn);
        let slate: Vec<ProjectId> = driver
            .studio()
            .projects()
            .iter()
            .filter(|p| !p.is_released())
            .map(|p| p.id.clone())
            .collect();
        for id in &slate {
            self.tend_project(driver, id, &mut turn);
        }
        if self.policy.pursue_sequels {
            self.try_sequels(driver, &mut turn);
        }
        self.shop_scripts(driver, &mut turn);

        match driver.apply(|s| s.end_week()) {
            Ok(report) => {
                info!(week = report.week, cash = %report.cash, deals = turn.deals.len(), "autopilot turn");
                turn.report = Some(report);
            }
            Err(e) => {
                debug!(error = %e, "week did not end");
                turn.stalled = Some(e.to_string());
            }
        }
        turn
    }

    fn settle_crises<D: StudioDriver>(&self, driver: &mut D, turn: &mut TurnSummary) {
        let studio = driver.studio();
        let cash = studio.cash();
        let picks: Vec<_> = studio
            .pending_crises()
            .iter()
            .filter_map(|c| choose_crisis_option(c, cash).map(|o| (c.id.clone(), o.clone())))
            .collect();
        for (crisis, option) in picks {
            match driver.apply(|s| s.resolve_crisis(&crisis, &option)) {
                Ok(resolution) => {
                    turn.crises_resolved += 1;
                    turn.deals.push(resolution.message());
                }
                Err(e) => debug!(%crisis, error = %e, "crisis left open"),
            }
        }
    }

    fn settle_decisions<D: StudioDriver>(&self, driver: &mut D, turn: &mut TurnSummary) {
        let picks: Vec<_> = driver
            .studio()
            .decision_queue()
            .iter()
            .filter_map(|d| choose_decision_option(d).map(|o| (d.id.clone(), o.clone())))
            .collect();
        for (decision, option) in picks {
            match driver.apply(|s| s.resolve_decision(&decision, &option)) {
                Ok(resolution) => {
                    turn.decisions_resolved += 1;
                    turn.deals.push(resolution.message());
                }
                Err(e) => debug!(%decision, error = %e, "decision left to expire"),
            }
        }
    }

    fn tend_project<D: StudioDriver>(&self, driver: &mut D, id: &ProjectId, turn: &mut TurnSummary) {
        let Some(phase) = driver.studio().project(id).map(|p| p.phase) else {
            return;
        };
        match phase {
            Phase::Development => self.staff_and_greenlight(driver, id, turn),
            Phase::PostProduction => self.prepare_release(driver, id, turn),
            _ => {}
        }
        let clear = driver
            .studio()
            .phase_blockers(id)
            .map(|b| b.is_empty())
            .unwrap_or(false);
        if !clear {
            return;
        }
        match driver.apply(|s| s.advance_project_phase(id)) {
            Ok(advance) => {
                turn.deals.push(advance.message());
                turn.releases.extend(advance.release);
            }
            Err(e) => debug!(project = %id, error = %e, "phase held"),
        }
    }

    fn staff_and_greenlight<D: StudioDriver>(
        &self,
        driver: &mut D,
        id: &ProjectId,
        turn: &mut TurnSummary,
    ) {
        let Some(project) = driver.studio().project(id) else {
            return;
        };
        let mut roles = Vec::new();
        if project.director_id.is_none() {
            roles.push(TalentRole::Director);
        }
        if project.cast_ids.is_empty() {
            roles.push(TalentRole::Actor);
        }
        let budget = project.production_budget;
        let greenlit = project.greenlight_approved;

        for role in roles {
            let Some(talent) = self.pick_talent(driver.studio(), role, budget) else {
                continue;
            };
            match driver.apply(|s| s.negotiate_and_attach_talent(id, &talent)) {
                Ok(deal) => turn.deals.push(deal.message()),
                Err(e) => debug!(project = %id, %talent, error = %e, "negotiation failed"),
            }
        }
        if !greenlit && driver.studio().cash() - budget >= self.policy.cash_reserve {
            match driver.apply(|s| s.greenlight_project(id)) {
                Ok(deal) => turn.deals.push(deal.message()),
                Err(e) => debug!(project = %id, error = %e, "greenlight failed"),
            }
        }
    }

    /// Strongest affordable talent within the fee share of `budget`, falling
    /// back to the cheapest affordable one.
    fn pick_talent(&self, studio: &StudioManager, role: TalentRole, budget: Decimal) -> Option<TalentId> {
        let (heat, tier) = (studio.heat(), studio.tier());
        let spendable = studio.cash() - self.policy.cash_reserve;
        let candidates: Vec<(TalentId, f32, Decimal)> = studio
            .talent()
            .iter()
            .filter(|t| t.role == role && t.is_available() && required_heat(t.power) <= heat)
            .map(|t| (t.id.clone(), t.power, quote_fee(t, heat, tier)))
            .filter(|(_, _, fee)| *fee <= spendable)
            .collect();
        let cap = budget * self.policy.talent_share;
        candidates
            .iter()
            .filter(|(_, _, fee)| *fee <= cap)
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.2.cmp(&a.2)))
            .or_else(|| candidates.iter().min_by_key(|c| c.2))
            .map(|(id, _, _)| id.clone())
    }

    fn prepare_release<D: StudioDriver>(&self, driver: &mut D, id: &ProjectId, turn: &mut TurnSummary) {
        let studio = driver.studio();
        let Some(project) = studio.project(id) else {
            return;
        };
        let (marketing, budget, booked, remaining) = (
            project.marketing_budget,
            project.production_budget,
            project.release_window.is_some(),
            project.scheduled_weeks_remaining,
        );
        let cash = studio.cash();
        let release_week = studio.week() + remaining + studio.config().durations.distribution;
        let partner = best_partner(studio);

        if marketing <= Decimal::ZERO {
            let target = (budget * self.policy.marketing_share).round_dp(0);
            let spendable = cash - self.policy.cash_reserve;
            let amount = if spendable > Decimal::ZERO {
                target.min(spendable)
            } else {
                target.min((cash / Decimal::TEN).round_dp(0))
            };
            if amount > Decimal::ZERO {
                match driver.apply(|s| s.fund_marketing(id, amount)) {
                    Ok(spend) => turn.deals.push(spend.message()),
                    Err(e) => debug!(project = %id, error = %e, "marketing not funded"),
                }
            }
        }
        if !booked {
            if let Some(partner) = partner {
                match driver.apply(|s| s.book_release(id, &partner, release_week)) {
                    Ok(booking) => turn.deals.push(booking.message()),
                    Err(e) => debug!(project = %id, %partner, error = %e, "booking failed"),
                }
            }
        }
    }

    fn try_sequels<D: StudioDriver>(&self, driver: &mut D, turn: &mut TurnSummary) {
        let studio = driver.studio();
        let mut active = active_projects(studio);
        let mut cash = studio.cash();
        let mut parents = Vec::new();
        for project in studio.projects().iter().filter(|p| p.is_released()) {
            if active >= self.policy.max_active_projects {
                break;
            }
            let Ok(eligibility) = studio.sequel_eligibility(&project.id) else {
                continue;
            };
            if eligibility.eligible && cash - eligibility.upfront_cost >= self.policy.cash_reserve {
                cash -= eligibility.upfront_cost;
                active += 1;
                parents.push(project.id.clone());
            }
        }
        for parent in parents {
            match driver.apply(|s| s.start_sequel(&parent)) {
                Ok(start) => turn.deals.push(start.message()),
                Err(e) => debug!(%parent, error = %e, "sequel not started"),
            }
        }
    }

    fn shop_scripts<D: StudioDriver>(&self, driver: &mut D, turn: &mut TurnSummary) {
        let studio = driver.studio();
        let reserve = self.policy.cash_reserve;
        let cash = studio.cash();
        let buy: Option<ScriptId> = if active_projects(studio) < self.policy.max_active_projects {
            studio
                .script_market()
                .iter()
                .filter(|s| s.quality >= self.policy.min_script_quality)
                .filter(|s| cash - s.asking_price - s.production_budget >= reserve)
                .max_by(|a, b| a.quality.total_cmp(&b.quality))
                .map(|s| s.id.clone())
        } else {
            None
        };
        let pass: Option<ScriptId> = studio
            .script_market()
            .iter()
            .filter(|s| s.quality < self.policy.min_script_quality)
            .min_by(|a, b| a.quality.total_cmp(&b.quality))
            .map(|s| s.id.clone());

        if let Some(script) = buy {
            match driver.apply(|s| s.acquire_script(&script)) {
                Ok(deal) => turn.deals.push(deal.message()),
                Err(e) => debug!(%script, error = %e, "script not acquired"),
            }
        }
        if let Some(script) = pass {
            if let Err(e) = driver.apply(|s| s.pass_script(&script)) {
                debug!(%script, error = %e, "script not passed");
            }
        }
    }
}

fn active_projects(studio: &StudioManager) -> usize {
    studio.projects().iter().filter(|p| !p.is_released()).count()
}

/// Friendliest partner that books screens.
fn best_partner(studio: &StudioManager) -> Option<PartnerId> {
    studio
        .partners()
        .iter()
        .filter(|p| p.kind != PartnerKind::Financier && p.stance != Stance::Hostile)
        .max_by_key(|p| p.stance)
        .map(|p| p.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::MemoryStore;
    use proptest::prelude::*;
    use std::sync::Arc;
    use studio_content::ContentPack;
    use studio_core::StudioConfig;

    fn manager(seed: u64) -> StudioManager {
        StudioManager::new(
            StudioConfig {
                rng_seed: seed,
                ..StudioConfig::default()
            },
            ContentPack::builtin().unwrap(),
        )
    }

    #[test]
    fn first_turn_ends_the_week() {
        let mut studio = manager(42);
        let turn = Autopilot::default().play_week(&mut studio);
        assert_eq!(turn.report.as_ref().map(|r| r.week), Some(2));
        assert!(turn.stalled.is_none());
        assert!(studio.projects().len() <= 1);
    }

    #[test]
    fn a_year_of_autoplay_ships_pictures() {
        let mut studio = manager(7);
        let turns = Autopilot::default().play(&mut studio, 60);
        assert!(studio.pending_crises().is_empty() || studio.is_bankrupt());
        assert!(studio.state().releases >= 1);
        let shipped: usize = turns.iter().map(|t| t.releases.len()).sum();
        assert_eq!(shipped as u32, studio.state().releases);
    }

    #[test]
    fn bankrupt_studio_stalls() {
        let mut studio = StudioManager::new(
            StudioConfig {
                starting_cash: Decimal::new(50_000, 0),
                bankruptcy_floor: Decimal::ZERO,
                crisis_chance: 0.0,
                decision_chance: 0.0,
                ..StudioConfig::default()
            },
            ContentPack::builtin().unwrap(),
        );
        let turns = Autopilot::default().play(&mut studio, 10);
        assert_eq!(turns.len(), 3);
        assert!(turns[1].report.as_ref().unwrap().went_bankrupt);
        assert!(turns[2].stalled.as_ref().unwrap().contains("credit floor"));
        assert!(studio.is_bankrupt());
    }

    #[tokio::test]
    async fn session_turns_are_saved() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::open(
            store.clone(),
            StudioConfig::default(),
            ContentPack::builtin().unwrap(),
        )
        .await;
        let turns = Autopilot::default().play(&mut session, 5);
        assert_eq!(turns.len(), 5);
        let status = session.close().await;
        assert!(status.last_ok);
        assert_eq!(status.last_saved_week, Some(6));
        assert_eq!(store.current().map(|s| s.state.week), Some(6));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]
        #[test]
        fn autoplay_never_leaves_the_desk_blocked(seed in 0u64..10_000) {
            let mut studio = manager(seed);
            let turns = Autopilot::default().play(&mut studio, 30);
            if !studio.is_bankrupt() {
                prop_assert_eq!(turns.len(), 30);
                prop_assert_eq!(studio.week(), 31);
            }
        }
    }
}
