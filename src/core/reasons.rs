use crate::core::scoring::Contribution;
use crate::models::MatchReason;

/// Pick the card reasons for a score
///
/// Highest positive contributions first. The sort is stable, so equal points
/// keep factor evaluation order.
pub fn select_reasons(contributions: &[Contribution], max_reasons: usize) -> Vec<MatchReason> {
    let mut ranked: Vec<&Contribution> = contributions
        .iter()
        .filter(|c| c.points > 0 && c.reason.is_some())
        .collect();

    ranked.sort_by(|a, b| b.points.cmp(&a.points));

    ranked
        .into_iter()
        .filter_map(|c| c.reason)
        .take(max_reasons)
        .collect()
}
