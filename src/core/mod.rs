// Core algorithm exports
pub mod commute;
pub mod filters;
pub mod matcher;
pub mod reasons;
pub mod scoring;

pub use commute::{haversine_km, CommuteModel};
pub use filters::{effective_price, eligible_candidates, is_eligible, validate_query};
pub use matcher::{MatchEngine, MatchError, MatchOutcome, DEFAULT_MAX_REASONS};
pub use reasons::select_reasons;
pub use scoring::{calculate_match_score, Contribution, ScoreCard, ScoringWeights, WeightsError};
