//! The serializable aggregate state and its persisted snapshot form.

use crate::arc::{ArcKind, ArcSubject, NarrativeArc, Partner};
use crate::chronicle::Chronicle;
use crate::config::StudioConfig;
use crate::events::{Crisis, DecisionItem};
use crate::ids::{PartnerId, ProjectId, ScriptId, TalentId};
use crate::ledger::FinancialLedger;
use crate::project::MovieProject;
use crate::talent::{Script, Talent};
use crate::tier::{Specialization, Tier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot layout version. Snapshots from other versions are rejected.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything a studio owns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudioState {
    pub studio_name: String,
    pub week: u32,
    pub tier: Tier,
    /// Reputation on a 0-100 scale.
    pub heat: f32,
    pub specialization: Specialization,
    pub ledger: FinancialLedger,
    pub projects: Vec<MovieProject>,
    pub talent: Vec<Talent>,
    pub script_market: Vec<Script>,
    pub partners: Vec<Partner>,
    pub pending_crises: Vec<Crisis>,
    pub decision_queue: Vec<DecisionItem>,
    pub chronicle: Chronicle,
    pub arcs: Vec<NarrativeArc>,
    /// Cumulative releases.
    pub releases: u32,
    /// Best opening weekend so far.
    pub record_opening: Option<Decimal>,
    /// Counter for minted ids.
    pub next_serial: u64,
}

impl StudioState {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            studio_name: config.studio_name.clone(),
            week: 1,
            tier: Tier::IndieStudio,
            heat: 10.0,
            specialization: config.specialization,
            ledger: FinancialLedger::new(config.starting_cash),
            projects: Vec::new(),
            talent: Vec::new(),
            script_market: Vec::new(),
            partners: Vec::new(),
            pending_crises: Vec::new(),
            decision_queue: Vec::new(),
            chronicle: Chronicle::new(),
            arcs: Vec::new(),
            releases: 0,
            record_opening: None,
            next_serial: 1,
        }
    }

    /// Returns a fresh id of the form `{prefix}-{n}`.
    pub fn mint_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_serial);
        self.next_serial += 1;
        id
    }

    pub fn project(&self, id: &ProjectId) -> Option<&MovieProject> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn project_mut(&mut self, id: &ProjectId) -> Option<&mut MovieProject> {
        self.projects.iter_mut().find(|p| &p.id == id)
    }

    pub fn talent(&self, id: &TalentId) -> Option<&Talent> {
        self.talent.iter().find(|t| &t.id == id)
    }

    pub fn talent_mut(&mut self, id: &TalentId) -> Option<&mut Talent> {
        self.talent.iter_mut().find(|t| &t.id == id)
    }

    pub fn script(&self, id: &ScriptId) -> Option<&Script> {
        self.script_market.iter().find(|s| &s.id == id)
    }

    pub fn partner(&self, id: &PartnerId) -> Option<&Partner> {
        self.partners.iter().find(|p| &p.id == id)
    }

    pub fn partner_mut(&mut self, id: &PartnerId) -> Option<&mut Partner> {
        self.partners.iter_mut().find(|p| &p.id == id)
    }

    pub fn active_arc(&self, kind: ArcKind, subject: &ArcSubject) -> Option<&NarrativeArc> {
        self.arcs
            .iter()
            .find(|a| a.is_active() && a.kind == kind && &a.subject == subject)
    }

    /// Number of unresolved crises tied to a project.
    pub fn crises_for(&self, project: &ProjectId) -> usize {
        self.pending_crises
            .iter()
            .filter(|c| c.project_id.as_ref() == Some(project))
            .count()
    }

    pub fn cash(&self) -> Decimal {
        self.ledger.cash()
    }
}

/// Position of the deterministic RNG stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngCheckpoint {
    pub seed: u64,
    /// ChaCha word position within the stream.
    pub word_pos: u64,
}

/// Complete persisted form of a studio; enough to rebuild it exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudioSnapshot {
    pub schema_version: u32,
    pub rng: RngCheckpoint,
    pub config: StudioConfig,
    pub state: StudioState,
}
