//! The studio aggregate and its action API.
//!
//! [`StudioManager`] exclusively owns the [`StudioState`], the configuration,
//! the content catalogs and the RNG stream. Each action validates first and
//! mutates only once every check has passed, so a rejected action leaves the
//! studio exactly as it was. The impl is split by concern across the child
//! modules.

mod crisis;
mod decision;
mod negotiation;
mod phase;
mod progression;
mod snapshot;
mod week;


pub use crisis::crisis_chance;

use crate::error::ActionError;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use studio_content::ContentPack;
use studio_core::calendar::week_start;
use studio_core::{
    ArcKind, ArcSubject, Bankruptcy, Chronicle, ChronicleCategory, Crisis, DecisionItem,
    MovieProject, NarrativeArc, Partner, ProjectId, ReleaseReport, Script, StudioConfig,
    StudioState, Talent, Tier,
};
use tracing::info;

/// Action families, used to decide what is still permitted after bankruptcy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Also covers the week's automatic processing.
    EndWeek,
    ResolveCrisis,
    ResolveDecision,
    OptionalAction,
    AcquireScript,
    PassScript,
    NegotiateTalent,
    AdvancePhase,
    Greenlight,
    FundMarketing,
    BookRelease,
    StartSequel,
    Restart,
}

impl ActionKind {
    /// Whether the action is still permitted once the studio is bankrupt.
    pub fn allowed_when_bankrupt(self) -> bool {
        matches!(self, ActionKind::PassScript | ActionKind::Restart)
    }
}

/// The root aggregate: one studio run, mutated only through its actions.
#[derive(Clone, Debug)]
pub struct StudioManager {
    config: StudioConfig,
    content: ContentPack,
    state: StudioState,
    rng: ChaCha8Rng,
    seed: u64,
}

impl StudioManager {
    /// Found a new studio: roster and partners come from the content pack
    /// and the script market is stocked from the seeded stream.
    pub fn new(config: StudioConfig, content: ContentPack) -> Self {
        let seed = config.rng_seed;
        let mut state = StudioState::new(&config);
        state.talent = content.roster.iter().map(|t| t.to_talent()).collect();
        state.partners = content.partners.iter().map(|p| p.to_partner()).collect();
        let mut studio = Self {
            config,
            content,
            state,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        };
        studio.refill_script_market();
        // Exhibitors that open the game cold start with their arc already running.
        let partners: Vec<_> = studio.state.partners.iter().map(|p| p.id.clone()).collect();
        for partner in partners {
            studio.process_arcs(progression::ArcTrigger::StanceChanged { partner });
        }
        info!(
            studio = %studio.state.studio_name,
            seed,
            cash = %studio.state.cash(),
            "studio founded"
        );
        studio
    }

    /// Throw the current run away and found the studio again from the same
    /// configuration. Permitted after bankruptcy.
    pub fn restart(&mut self) -> Result<(), ActionError> {
        self.guard(ActionKind::Restart)?;
        *self = Self::new(self.config.clone(), self.content.clone());
        Ok(())
    }

    /// Whole studio state, read-only.
    pub fn state(&self) -> &StudioState {
        &self.state
    }

    /// Configuration the studio was founded with.
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Catalogs the studio draws scripts, talent and events from.
    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    /// Current week, starting at 1.
    pub fn week(&self) -> u32 {
        self.state.week
    }

    /// Cash on hand.
    pub fn cash(&self) -> Decimal {
        self.state.cash()
    }

    /// Current tier. Never regresses.
    pub fn tier(&self) -> Tier {
        self.state.tier
    }

    /// Studio heat in `[0, 100]`.
    pub fn heat(&self) -> f32 {
        self.state.heat
    }

    /// Whether the studio has gone under. Sticky.
    pub fn is_bankrupt(&self) -> bool {
        self.state.ledger.is_bankrupt()
    }

    /// When and why the studio went under.
    pub fn bankruptcy(&self) -> Option<&Bankruptcy> {
        self.state.ledger.bankruptcy()
    }

    /// The slate, released pictures included.
    pub fn projects(&self) -> &[MovieProject] {
        &self.state.projects
    }

    /// Look up one project.
    pub fn project(&self, id: &ProjectId) -> Option<&MovieProject> {
        self.state.project(id)
    }

    /// Talent roster with current commitments.
    pub fn talent(&self) -> &[Talent] {
        &self.state.talent
    }

    /// Exhibitors, financiers and distributors with their stances.
    pub fn partners(&self) -> &[Partner] {
        &self.state.partners
    }

    /// Scripts currently up for sale.
    pub fn script_market(&self) -> &[Script] {
        &self.state.script_market
    }

    /// Crises that must be resolved before the week can end.
    pub fn pending_crises(&self) -> &[Crisis] {
        &self.state.pending_crises
    }

    /// Timed decisions, soonest to expire first.
    pub fn decision_queue(&self) -> &[DecisionItem] {
        &self.state.decision_queue
    }

    /// Append-only history of the run.
    pub fn chronicle(&self) -> &Chronicle {
        &self.state.chronicle
    }

    /// Every arc started this run, resolved ones included.
    pub fn arcs(&self) -> &[NarrativeArc] {
        &self.state.arcs
    }

    /// The active arc of `kind` for `subject`, if any.
    pub fn active_arc(&self, kind: ArcKind, subject: &ArcSubject) -> Option<&NarrativeArc> {
        self.state.active_arc(kind, subject)
    }

    /// Outcome report of a released project.
    pub fn release_report(&self, id: &ProjectId) -> Option<&ReleaseReport> {
        self.state
            .project(id)
            .and_then(|p| p.release.as_ref())
            .map(|r| &r.report)
    }

    fn guard(&self, kind: ActionKind) -> Result<(), ActionError> {
        match self.state.ledger.bankruptcy() {
            Some(b) if !kind.allowed_when_bankrupt() => Err(ActionError::Bankrupt {
                reason: b.reason.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn require_funds(&self, amount: Decimal) -> Result<(), ActionError> {
        if self.state.ledger.can_afford(amount) {
            Ok(())
        } else {
            Err(ActionError::InsufficientFunds {
                needed: amount,
                available: self.state.cash(),
            })
        }
    }

    fn find_project(&self, id: &ProjectId) -> Result<&MovieProject, ActionError> {
        self.state
            .project(id)
            .ok_or_else(|| ActionError::UnknownProject(id.clone()))
    }

    fn today(&self) -> NaiveDate {
        week_start(self.config.season_start, self.state.week)
    }

    fn record(&mut self, category: ChronicleCategory, description: impl Into<String>) {
        let (week, date) = (self.state.week, self.today());
        self.state
            .chronicle
            .record(week, date, category, description);
    }

    fn adjust_heat(&mut self, delta: f32) {
        self.state.heat = (self.state.heat + delta).clamp(0.0, 100.0);
    }

    fn check_solvency(&mut self) -> bool {
        self.state
            .ledger
            .check_solvency(self.config.bankruptcy_floor, self.state.week)
    }
}
