use thiserror::Error;
use crate::core::{
    filters::{effective_price, eligible_candidates, validate_query},
    reasons::select_reasons,
    scoring::{calculate_match_score, ScoringWeights},
};
use crate::models::{BuyerQuery, MatchResult, MatchSession, PropertyCandidate};

/// Default number of reasons shown on a result card
pub const DEFAULT_MAX_REASONS: usize = 3;

#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Output of one search invocation
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub session_id: MatchSession,
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Smart Match engine - filters, scores and ranks an inventory snapshot
///
/// # Pipeline Stages
/// 1. Query validation
/// 2. Candidate eligibility (status, purpose price, property type)
/// 3. Scoring and reason selection
/// 4. Stable ranking by score
///
/// The engine holds no mutable state and performs no I/O, so a single
/// instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    weights: ScoringWeights,
    max_reasons: usize,
}

impl MatchEngine {
    pub fn new(weights: ScoringWeights, max_reasons: usize) -> Self {
        Self {
            weights,
            max_reasons,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_MAX_REASONS)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Run a search under a fresh session id
    ///
    /// # Arguments
    /// * `query` - The buyer's wizard answers
    /// * `candidates` - Inventory snapshot from the inventory collaborator
    ///
    /// # Returns
    /// MatchOutcome with every eligible candidate, ranked
    pub fn find_matches(
        &self,
        query: &BuyerQuery,
        candidates: &[PropertyCandidate],
    ) -> Result<MatchOutcome, MatchError> {
        let matches = self.rank(query, candidates)?;

        Ok(MatchOutcome {
            session_id: MatchSession::new(),
            matches,
            total_candidates: candidates.len(),
        })
    }

    /// Score and rank without allocating a session
    ///
    /// Deterministic: identical inputs give identical output, including order.
    pub fn rank(
        &self,
        query: &BuyerQuery,
        candidates: &[PropertyCandidate],
    ) -> Result<Vec<MatchResult>, MatchError> {
        validate_query(query)?;

        let mut results: Vec<MatchResult> = eligible_candidates(candidates, query)
            .filter_map(|candidate| {
                let price = effective_price(candidate, query.purpose)?;
                let card = calculate_match_score(candidate, query, &self.weights);

                Some(MatchResult {
                    property_id: candidate.id.clone(),
                    title: candidate.title.clone(),
                    slug: candidate.slug.clone(),
                    property_type: candidate.property_type,
                    listing_type: candidate.listing_type,
                    effective_price: price,
                    price: candidate.price,
                    original_price: candidate.original_price,
                    rental_price: candidate.rental_price,
                    original_rental_price: candidate.original_rental_price,
                    bedrooms: candidate.bedrooms,
                    bathrooms: candidate.bathrooms,
                    size_sqm: candidate.size_sqm,
                    popular_area: candidate.popular_area.clone(),
                    district: candidate.district.clone(),
                    province: candidate.province.clone(),
                    commute_time_minutes: candidate.commute_time_minutes,
                    near_transit: candidate.near_transit,
                    transit_type: candidate.transit_type.clone(),
                    transit_station_name: candidate.transit_station_name.clone(),
                    transit_distance_meters: candidate.transit_distance_meters,
                    image_url: candidate.image_url.clone(),
                    match_score: card.score,
                    score_breakdown: card.breakdown(),
                    match_reasons: select_reasons(&card.contributions, self.max_reasons),
                })
            })
            .collect();

        // sort_by is stable: equal scores keep snapshot order
        results.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        tracing::debug!(
            "Ranked {} of {} candidates for purpose {}",
            results.len(),
            candidates.len(),
            query.purpose
        );

        Ok(results)
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
