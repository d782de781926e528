#![deny(warnings)]

//! Economic models for Studio Tycoon.
//!
//! This crate provides the pure numeric models used by the studio engine:
//! - Release simulation (box office, scores, awards, outcome breakdown)
//! - Sequel eligibility projection
//! - Talent fee quotes

pub mod fees;
pub mod release;
pub mod sequel;

pub use fees::{quote_fee, required_heat};
pub use release::{outcome_for_roi, simulate, ReleaseInputs};
pub use sequel::{evaluate as evaluate_sequel, SequelContext, SequelEligibility};

use thiserror::Error;

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// A picture must cost something to be released.
    #[error("production budget must be > 0")]
    InvalidBudget,
    /// Money values must be non-negative.
    #[error("invalid price or cost value")]
    InvalidPrice,
    /// Numeric conversion failed or produced a non-finite value.
    #[error("non-finite numeric conversion")]
    NonFinite,
}
