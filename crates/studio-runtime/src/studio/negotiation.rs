//! Deals: talent, scripts, greenlights, marketing, release bookings and
//! sequels. Each one is accepted in full or rejected without side effects.

use super::progression::PASSION_PROJECT_QUALITY;
use super::*;
use crate::outcome::{
    GreenlightDeal, MarketingSpend, ReleaseBooking, ScriptDeal, SequelStart, TalentDeal,
};
use rand::Rng;
use studio_core::{
    DealId, FranchiseLink, PartnerId, PartnerKind, Phase, ScriptId, Stance, TalentId, TalentRole,
};
use studio_econ::{evaluate_sequel, quote_fee, required_heat, SequelContext, SequelEligibility};

/// Share of the production budget a competitive partner charges to book.
const COMPETITIVE_BOOKING_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

impl StudioManager {
    /// Negotiate with a director or actor and attach them to a project.
    pub fn negotiate_and_attach_talent(
        &mut self,
        project_id: &ProjectId,
        talent_id: &TalentId,
    ) -> Result<TalentDeal, ActionError> {
        self.guard(ActionKind::NegotiateTalent)?;
        let project = self.find_project(project_id)?;
        if project.is_released() {
            return Err(ActionError::WrongPhase {
                project: project_id.clone(),
                phase: project.phase,
            });
        }
        let talent = self
            .state
            .talent(talent_id)
            .ok_or_else(|| ActionError::UnknownTalent(talent_id.clone()))?;
        if project.has_talent(talent_id) {
            return Err(ActionError::AlreadyAttached {
                talent: talent_id.clone(),
                project: project_id.clone(),
            });
        }
        if let Some(other) = &talent.committed_to {
            return Err(ActionError::TalentCommitted {
                talent: talent_id.clone(),
                project: other.clone(),
            });
        }
        match talent.role {
            TalentRole::Director if project.director_id.is_some() => {
                return Err(ActionError::DirectorSlotTaken(project_id.clone()));
            }
            TalentRole::Actor if project.cast_ids.len() >= self.config.max_cast => {
                return Err(ActionError::CastFull {
                    max: self.config.max_cast,
                });
            }
            _ => {}
        }
        let required = required_heat(talent.power);
        if self.state.heat < required {
            return Err(ActionError::HeatTooLow {
                talent: talent_id.clone(),
                required,
                heat: self.state.heat,
            });
        }
        let fee = quote_fee(talent, self.state.heat, self.state.tier);
        self.require_funds(fee)?;
        let role = talent.role;

        self.state.ledger.debit(fee);
        if let Some(talent) = self.state.talent_mut(talent_id) {
            talent.committed_to = Some(project_id.clone());
        }
        if let Some(project) = self.state.project_mut(project_id) {
            match role {
                TalentRole::Director => project.director_id = Some(talent_id.clone()),
                TalentRole::Actor => {
                    project.cast_ids.insert(talent_id.clone());
                }
            }
        }
        info!(project = %project_id, talent = %talent_id, ?role, %fee, "talent attached");
        Ok(TalentDeal {
            project: project_id.clone(),
            talent: talent_id.clone(),
            role,
            fee,
        })
    }

    /// Buy a script off the market and open a development project for it.
    pub fn acquire_script(&mut self, script_id: &ScriptId) -> Result<ScriptDeal, ActionError> {
        self.guard(ActionKind::AcquireScript)?;
        let index = self.market_index(script_id)?;
        let price = self.state.script_market[index].asking_price;
        self.require_funds(price)?;

        let script = self.state.script_market.remove(index);
        self.state.ledger.debit(price);
        let project_id = ProjectId::new(self.state.mint_id("proj"));
        self.state.projects.push(MovieProject::in_development(
            project_id.clone(),
            script.title.clone(),
            script.genre,
            script.quality,
            script.production_budget,
        ));
        if script.quality >= PASSION_PROJECT_QUALITY {
            self.start_arc(ArcKind::PassionProject, ArcSubject::Project(project_id.clone()));
        }
        info!(script = %script_id, project = %project_id, %price, quality = script.quality, "script acquired");
        Ok(ScriptDeal {
            script: script.id,
            title: script.title,
            project: Some(project_id),
            price,
        })
    }

    /// Take a script off the market. Permitted after bankruptcy.
    pub fn pass_script(&mut self, script_id: &ScriptId) -> Result<ScriptDeal, ActionError> {
        self.guard(ActionKind::PassScript)?;
        let index = self.market_index(script_id)?;
        let script = self.state.script_market.remove(index);
        info!(script = %script_id, "script passed");
        Ok(ScriptDeal {
            script: script.id,
            title: script.title,
            project: None,
            price: Decimal::ZERO,
        })
    }

    fn market_index(&self, script_id: &ScriptId) -> Result<usize, ActionError> {
        self.state
            .script_market
            .iter()
            .position(|s| &s.id == script_id)
            .ok_or_else(|| ActionError::UnknownScript(script_id.clone()))
    }

    /// Top the script market back up to its configured size.
    pub(super) fn refill_script_market(&mut self) {
        if self.content.scripts.is_empty() {
            return;
        }
        while self.state.script_market.len() < self.config.script_market_size {
            let template = self.rng.gen_range(0..self.content.scripts.len());
            let id = ScriptId::new(self.state.mint_id("script"));
            let script = self.content.scripts[template].roll(id, &mut self.rng);
            self.state.script_market.push(script);
        }
    }

    /// Approve a development project and pay its production budget.
    pub fn greenlight_project(
        &mut self,
        project_id: &ProjectId,
    ) -> Result<GreenlightDeal, ActionError> {
        self.guard(ActionKind::Greenlight)?;
        let project = self.find_project(project_id)?;
        if project.phase != Phase::Development {
            return Err(ActionError::WrongPhase {
                project: project_id.clone(),
                phase: project.phase,
            });
        }
        if project.greenlight_approved {
            return Err(ActionError::AlreadyGreenlit(project_id.clone()));
        }
        let budget = project.production_budget;
        self.require_funds(budget)?;

        self.state.ledger.debit(budget);
        if let Some(project) = self.state.project_mut(project_id) {
            project.greenlight_approved = true;
        }
        info!(project = %project_id, %budget, "project greenlit");
        Ok(GreenlightDeal {
            project: project_id.clone(),
            budget,
        })
    }

    /// Add to a project's marketing budget.
    pub fn fund_marketing(
        &mut self,
        project_id: &ProjectId,
        amount: Decimal,
    ) -> Result<MarketingSpend, ActionError> {
        self.guard(ActionKind::FundMarketing)?;
        if amount <= Decimal::ZERO {
            return Err(ActionError::InvalidAmount);
        }
        let project = self.find_project(project_id)?;
        if project.is_released() {
            return Err(ActionError::WrongPhase {
                project: project_id.clone(),
                phase: project.phase,
            });
        }
        self.require_funds(amount)?;

        self.state.ledger.debit(amount);
        let mut total = amount;
        if let Some(project) = self.state.project_mut(project_id) {
            project.marketing_budget += amount;
            total = project.marketing_budget;
        }
        info!(project = %project_id, %amount, %total, "marketing funded");
        Ok(MarketingSpend {
            project: project_id.clone(),
            added: amount,
            total,
        })
    }

    /// Book a release window with an exhibitor or distributor.
    pub fn book_release(
        &mut self,
        project_id: &ProjectId,
        partner_id: &PartnerId,
        week: u32,
    ) -> Result<ReleaseBooking, ActionError> {
        self.guard(ActionKind::BookRelease)?;
        let project = self.find_project(project_id)?;
        if project.is_released() {
            return Err(ActionError::WrongPhase {
                project: project_id.clone(),
                phase: project.phase,
            });
        }
        if week < self.state.week {
            return Err(ActionError::ReleaseWeekPassed {
                week,
                current: self.state.week,
            });
        }
        let partner = self
            .state
            .partner(partner_id)
            .ok_or_else(|| ActionError::UnknownPartner(partner_id.clone()))?;
        if partner.kind == PartnerKind::Financier {
            return Err(ActionError::PartnerRefused {
                partner: partner_id.clone(),
                reason: "financiers do not book screens".to_string(),
            });
        }
        let fee = match partner.stance {
            Stance::Hostile => {
                return Err(ActionError::PartnerRefused {
                    partner: partner_id.clone(),
                    reason: "relations are hostile".to_string(),
                });
            }
            Stance::Competitive => (project.production_budget * COMPETITIVE_BOOKING_FEE).round_dp(0),
            Stance::Neutral | Stance::Respectful => Decimal::ZERO,
        };
        self.require_funds(fee)?;

        self.state.ledger.debit(fee);
        let window = DealId::new(format!("{partner_id}-w{week}"));
        if let Some(project) = self.state.project_mut(project_id) {
            project.release_window = Some(window.clone());
            project.release_week = Some(week);
            project.distributor = Some(partner_id.clone());
        }
        info!(project = %project_id, partner = %partner_id, week, %fee, "release booked");
        Ok(ReleaseBooking {
            project: project_id.clone(),
            partner: partner_id.clone(),
            window,
            week,
            fee,
        })
    }

    /// Whether a project can spawn a sequel, with projected carryover.
    pub fn sequel_eligibility(
        &self,
        project_id: &ProjectId,
    ) -> Result<SequelEligibility, ActionError> {
        let project = self.find_project(project_id)?;
        let sequel_exists = self
            .state
            .projects
            .iter()
            .any(|p| p.franchise.as_ref().map(|f| &f.parent) == Some(project_id));
        Ok(evaluate_sequel(
            project,
            SequelContext {
                heat: self.state.heat,
                sequel_exists,
            },
        ))
    }

    /// Pay the upfront cost and open the next episode in development.
    pub fn start_sequel(&mut self, parent_id: &ProjectId) -> Result<SequelStart, ActionError> {
        self.guard(ActionKind::StartSequel)?;
        let eligibility = self.sequel_eligibility(parent_id)?;
        if let Some(reason) = eligibility.reason {
            return Err(ActionError::SequelIneligible(reason));
        }
        self.require_funds(eligibility.upfront_cost)?;
        let parent = self.find_project(parent_id)?;
        let title = sequel_title(&parent.title, eligibility.next_episode);
        let (genre, quality, budget) = (parent.genre, parent.script_quality, parent.production_budget);
        let hype = (eligibility.carryover_hype as f32).clamp(0.0, 100.0);

        self.state.ledger.debit(eligibility.upfront_cost);
        let project_id = ProjectId::new(self.state.mint_id("proj"));
        let mut sequel =
            MovieProject::in_development(project_id.clone(), title, genre, quality, budget);
        sequel.buzz = hype;
        sequel.franchise = Some(FranchiseLink {
            parent: parent_id.clone(),
            episode: eligibility.next_episode,
        });
        self.state.projects.push(sequel);
        self.start_arc(ArcKind::FranchisePivot, ArcSubject::Project(project_id.clone()));
        info!(parent = %parent_id, project = %project_id, episode = eligibility.next_episode, "sequel started");
        Ok(SequelStart {
            parent: parent_id.clone(),
            project: project_id,
            episode: eligibility.next_episode,
            upfront_cost: eligibility.upfront_cost,
            carryover_hype: hype,
        })
    }
}

/// "Night Ferry" episode 3 becomes "Night Ferry 3", replacing any trailing
/// episode number already present.
fn sequel_title(title: &str, episode: u32) -> String {
    let base = match title.rsplit_once(' ') {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_digit()) => head,
        _ => title,
    };
    format!("{base} {episode}")
}

#[cfg(test)]
mod tests {
    use super::sequel_title;

    #[test]
    fn sequel_titles_number_episodes() {
        assert_eq!(sequel_title("Night Ferry", 2), "Night Ferry 2");
        assert_eq!(sequel_title("Night Ferry 2", 3), "Night Ferry 3");
        assert_eq!(sequel_title("1984", 2), "1984 2");
    }
}
