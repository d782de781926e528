#![deny(warnings)]

//! Studio simulation engine.
//!
//! [`StudioManager`] is the root aggregate: it owns the studio state and
//! exposes the week-advance and player-action API. [`Session`] wraps a
//! manager with background persistence, saving after every successful
//! action.

pub mod config;
pub mod error;
pub mod outcome;
pub mod session;
pub mod studio;

pub use config::{load_config, parse_config, ConfigError};
pub use error::{ActionError, PhaseBlocker, SnapshotError};
pub use outcome::{
    CrisisResolution, DecisionResolution, ExpiredDecision, GreenlightDeal, MarketingSpend,
    OptionalAction, OptionalOutcome, PhaseAdvance, ReleaseBooking, ReleaseSummary, ScriptDeal,
    SequelStart, TalentDeal, WeekReport,
};
pub use session::Session;
pub use studio::{crisis_chance, ActionKind, StudioManager};
