//! Smart Match - property recommendation engine for the real-estate CRM
//!
//! Turns a buyer's wizard answers (purpose, type, budget, area, transit)
//! into a ranked list of listings, each with a 0-100 match score, a
//! per-factor breakdown and the reasons shown on its result card.

pub mod config;
pub mod core;
pub mod i18n;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchEngine, MatchError, MatchOutcome, ScoringWeights, calculate_match_score};
pub use models::{BuyerQuery, MatchReason, MatchResult, MatchSession, PropertyCandidate, ScoreFactor};
