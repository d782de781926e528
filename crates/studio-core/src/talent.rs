//! Talent roster entries and scripts offered on the market.

use crate::ids::{ProjectId, ScriptId, TalentId};
use crate::project::Genre;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which slot a piece of talent fills on a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TalentRole {
    Director,
    Actor,
}

/// A director or actor the studio can negotiate with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub id: TalentId,
    pub name: String,
    pub role: TalentRole,
    /// Base asking fee before studio-specific adjustments.
    pub fee: Decimal,
    /// Draw on a 0-10 scale.
    pub power: f32,
    /// Project currently holding this talent, if any.
    pub committed_to: Option<ProjectId>,
}

impl Talent {
    pub fn is_available(&self) -> bool {
        self.committed_to.is_none()
    }
}

/// A script for sale. Buying it opens a development project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: ScriptId,
    pub title: String,
    pub genre: Genre,
    /// Quality on a 0-10 scale.
    pub quality: f32,
    pub asking_price: Decimal,
    /// Estimated cost of producing the picture.
    pub production_budget: Decimal,
}
