use crate::core::matcher::MatchError;
use crate::models::{BuyerQuery, PropertyCandidate, Purpose};

/// Reject queries the wizard should never have submitted
///
/// Runs before any candidate is looked at; invalid ranges are never coerced.
pub fn validate_query(query: &BuyerQuery) -> Result<(), MatchError> {
    if !query.budget_min.is_finite() || !query.budget_max.is_finite() {
        return Err(MatchError::InvalidQuery(
            "budget bounds must be finite numbers".to_string(),
        ));
    }

    if query.budget_min < 0.0 || query.budget_max < 0.0 {
        return Err(MatchError::InvalidQuery(format!(
            "budget bounds must be non-negative (min {}, max {})",
            query.budget_min, query.budget_max
        )));
    }

    if query.budget_min > query.budget_max {
        return Err(MatchError::InvalidQuery(format!(
            "budgetMin {} is greater than budgetMax {}",
            query.budget_min, query.budget_max
        )));
    }

    Ok(())
}

#[inline]
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Price the buyer's budget is compared against
///
/// Rental price for RENT, sale price otherwise; the "original" field is the
/// fallback when the current one is missing or zero.
#[inline]
pub fn effective_price(candidate: &PropertyCandidate, purpose: Purpose) -> Option<f64> {
    if purpose.uses_rental_price() {
        positive(candidate.rental_price).or_else(|| positive(candidate.original_rental_price))
    } else {
        positive(candidate.price).or_else(|| positive(candidate.original_price))
    }
}

/// Check whether a candidate may be scored for this query
///
/// Budget is deliberately not checked here: buyers close to a budget
/// boundary still see nearby listings, ranked lower by the budget factor.
#[inline]
pub fn is_eligible(candidate: &PropertyCandidate, query: &BuyerQuery) -> bool {
    if !candidate.is_active() {
        return false;
    }

    if effective_price(candidate, query.purpose).is_none() {
        return false;
    }

    match query.property_type {
        Some(wanted) => candidate.property_type == wanted,
        None => true,
    }
}

/// Eligible subset of the snapshot, in input order
pub fn eligible_candidates<'a>(
    candidates: &'a [PropertyCandidate],
    query: &'a BuyerQuery,
) -> impl Iterator<Item = &'a PropertyCandidate> + 'a {
    candidates.iter().filter(move |c| is_eligible(c, query))
}
