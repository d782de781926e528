//! Crises (blocking) and decisions (timed, non-blocking).

use crate::arc::ArcKind;
use crate::ids::{CrisisId, DecisionId, OptionId, ProjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How badly a crisis threatens the picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One way out of a crisis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrisisOption {
    pub id: OptionId,
    pub label: String,
    pub preview: String,
    /// Signed change to cash.
    pub cash_delta: Decimal,
    /// Signed change to the project's remaining scheduled weeks.
    pub schedule_delta: i32,
    /// Signed change to the project's production quality.
    pub quality_delta: f32,
}

/// A blocking event. Time cannot advance while any crisis is pending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crisis {
    pub id: CrisisId,
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub project_id: Option<ProjectId>,
    /// Narrative arc ignited when the crisis is resolved.
    pub arc_hook: Option<ArcKind>,
    pub options: Vec<CrisisOption>,
    pub raised_week: u32,
}

impl Crisis {
    pub fn option(&self, id: &OptionId) -> Option<&CrisisOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}

/// One answer to a decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: OptionId,
    pub label: String,
    pub preview: String,
    pub cash_delta: Decimal,
    pub heat_delta: f32,
}

/// A timed choice that resolves itself when it expires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionItem {
    pub id: DecisionId,
    pub title: String,
    pub body: String,
    pub weeks_until_expiry: i32,
    /// Option applied on expiry. Items without one are dropped.
    pub default_option: Option<OptionId>,
    pub options: Vec<DecisionOption>,
}

impl DecisionItem {
    pub fn option(&self, id: &OptionId) -> Option<&DecisionOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}
