use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::core::filters::effective_price;
use crate::models::{BuyerQuery, MatchReason, PropertyCandidate, ScoreEntry, ScoreFactor};

/// Scoring table: the weight and curve parameters of every factor
///
/// Maximum attainable points are
/// `budget_fit + area_exact + transit_proximity + commute_time + type_match`,
/// which the defaults keep at exactly 100.
///
/// Missing fields deserialize to their defaults, so a config file only
/// needs to name the weights it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Points for an effective price inside the budget window
    pub budget_fit: f64,
    /// Relative distance from the window at which budget points reach zero
    pub budget_tolerance: f64,
    /// Largest penalty applied far outside the window
    pub budget_penalty: f64,
    pub area_exact: f64,
    pub area_partial: f64,
    /// Points for a station within `transit_full_within_meters`
    pub transit_proximity: f64,
    pub transit_full_within_meters: f64,
    /// Farthest distance still flagged as near transit
    pub transit_near_band_meters: f64,
    /// Flat points when the listing is near transit but the distance is
    /// unknown; never more than a known station at the edge of the near band
    pub transit_unknown_distance: f64,
    /// Points for a zero-minute commute
    pub commute_time: f64,
    /// Commute at which half of `commute_time` is awarded
    pub commute_half_minutes: f64,
    pub type_match: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget_fit: 40.0,
            budget_tolerance: 0.3,
            budget_penalty: 10.0,
            area_exact: 25.0,
            area_partial: 15.0,
            transit_proximity: 20.0,
            transit_full_within_meters: 300.0,
            transit_near_band_meters: 1000.0,
            transit_unknown_distance: 6.0,
            commute_time: 10.0,
            commute_half_minutes: 30.0,
            type_match: 5.0,
        }
    }
}

/// A scoring table that would break the ordering rules between factors
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid scoring weights: {0}")]
pub struct WeightsError(String);

impl ScoringWeights {
    /// Check the table keeps exact areas above partial ones, budget points
    /// non-increasing away from the window and every penalty bounded
    pub fn validate(&self) -> Result<(), WeightsError> {
        let values = [
            ("budget_fit", self.budget_fit),
            ("budget_tolerance", self.budget_tolerance),
            ("budget_penalty", self.budget_penalty),
            ("area_exact", self.area_exact),
            ("area_partial", self.area_partial),
            ("transit_proximity", self.transit_proximity),
            ("transit_full_within_meters", self.transit_full_within_meters),
            ("transit_near_band_meters", self.transit_near_band_meters),
            ("transit_unknown_distance", self.transit_unknown_distance),
            ("commute_time", self.commute_time),
            ("commute_half_minutes", self.commute_half_minutes),
            ("type_match", self.type_match),
        ];

        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError(format!("{} must be a finite non-negative number, got {}", name, value)));
            }
        }

        if self.budget_tolerance == 0.0 {
            return Err(WeightsError("budget_tolerance must be greater than 0".to_string()));
        }
        if self.commute_half_minutes == 0.0 {
            return Err(WeightsError("commute_half_minutes must be greater than 0".to_string()));
        }
        if self.transit_full_within_meters == 0.0 {
            return Err(WeightsError("transit_full_within_meters must be greater than 0".to_string()));
        }
        if self.area_partial > self.area_exact {
            return Err(WeightsError(format!(
                "area_partial ({}) must not exceed area_exact ({})",
                self.area_partial, self.area_exact
            )));
        }
        if self.transit_unknown_distance > self.transit_proximity {
            return Err(WeightsError(format!(
                "transit_unknown_distance ({}) must not exceed transit_proximity ({})",
                self.transit_unknown_distance, self.transit_proximity
            )));
        }
        if self.transit_near_band_meters < self.transit_full_within_meters {
            return Err(WeightsError(format!(
                "transit_near_band_meters ({}) must not be below transit_full_within_meters ({})",
                self.transit_near_band_meters, self.transit_full_within_meters
            )));
        }

        Ok(())
    }

    /// Highest points a factor can award
    pub fn max_points(&self, factor: ScoreFactor) -> f64 {
        match factor {
            ScoreFactor::BudgetFit => self.budget_fit,
            ScoreFactor::AreaMatch => self.area_exact.max(self.area_partial),
            ScoreFactor::TransitProximity => {
                self.transit_proximity.max(self.transit_unknown_distance)
            }
            ScoreFactor::CommuteTime => self.commute_time,
            ScoreFactor::TypeMatch => self.type_match,
        }
    }
}

/// Points one factor awarded, plus the card reason it justifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub factor: ScoreFactor,
    pub points: i32,
    pub reason: Option<MatchReason>,
}

/// Total score and the contributions that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub score: u8,
    pub contributions: Vec<Contribution>,
}

impl ScoreCard {
    pub fn breakdown(&self) -> Vec<ScoreEntry> {
        self.contributions
            .iter()
            .map(|c| ScoreEntry {
                label: c.factor,
                points: c.points,
            })
            .collect()
    }
}

/// Calculate a match score (0-100) for a candidate against a buyer query
///
/// Factors are evaluated in a fixed order (budget, area, transit, commute,
/// type). Each is rounded to whole points; factors that round to zero are
/// left out of the breakdown. The score is the clamped sum of the entries.
pub fn calculate_match_score(
    candidate: &PropertyCandidate,
    query: &BuyerQuery,
    weights: &ScoringWeights,
) -> ScoreCard {
    let mut contributions = Vec::with_capacity(5);

    if let Some(price) = effective_price(candidate, query.purpose) {
        if let Some((points, reason)) =
            budget_points(price, query.budget_min, query.budget_max, weights)
        {
            push(&mut contributions, ScoreFactor::BudgetFit, points, reason);
        }
    }

    if let Some((points, reason)) = area_points(candidate, &query.area, weights) {
        push(&mut contributions, ScoreFactor::AreaMatch, points, Some(reason));
    }

    if query.near_transit {
        if let Some(points) = transit_points(candidate, weights) {
            push(
                &mut contributions,
                ScoreFactor::TransitProximity,
                points,
                Some(MatchReason::NearTransit),
            );
        }
    }

    if let Some(minutes) = candidate.commute_time_minutes {
        push(
            &mut contributions,
            ScoreFactor::CommuteTime,
            commute_points(minutes, weights),
            Some(MatchReason::ShortCommute),
        );
    }

    if query.property_type == Some(candidate.property_type) {
        push(
            &mut contributions,
            ScoreFactor::TypeMatch,
            weights.type_match,
            Some(MatchReason::MatchesPropertyType),
        );
    }

    let total: i32 = contributions.iter().map(|c| c.points).sum();

    ScoreCard {
        score: total.clamp(0, 100) as u8,
        contributions,
    }
}

fn push(
    contributions: &mut Vec<Contribution>,
    factor: ScoreFactor,
    points: f64,
    reason: Option<MatchReason>,
) {
    let points = points.round() as i32;
    if points == 0 {
        return;
    }

    contributions.push(Contribution {
        factor,
        points,
        // Negative entries never justify a reason
        reason: if points > 0 { reason } else { None },
    });
}

/// Budget points for an effective price
///
/// Full points inside the window. Outside, points fall linearly with the
/// relative distance to the nearest bound until `budget_tolerance`, then turn
/// into a penalty that bottoms out at `-budget_penalty` at twice the
/// tolerance. Returns `None` when the buyer stated no budget (both bounds 0).
pub fn budget_points(
    price: f64,
    budget_min: f64,
    budget_max: f64,
    weights: &ScoringWeights,
) -> Option<(f64, Option<MatchReason>)> {
    if budget_max <= 0.0 {
        return None;
    }

    if price >= budget_min && price <= budget_max {
        return Some((weights.budget_fit, Some(MatchReason::WithinBudget)));
    }

    // Only reachable with budget_min > 0 when under budget
    let relative = if price > budget_max {
        (price - budget_max) / budget_max
    } else {
        (budget_min - price) / budget_min
    };

    let tolerance = weights.budget_tolerance.max(f64::EPSILON);

    if relative <= tolerance {
        let points = weights.budget_fit * (1.0 - relative / tolerance);
        Some((points, Some(MatchReason::CloseToBudget)))
    } else {
        let overshoot = ((relative - tolerance) / tolerance).min(1.0);
        Some((-weights.budget_penalty * overshoot, None))
    }
}

fn normalize_area(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Area points: exact match on popular area or district beats a substring match
pub fn area_points(
    candidate: &PropertyCandidate,
    area: &str,
    weights: &ScoringWeights,
) -> Option<(f64, MatchReason)> {
    let wanted = normalize_area(area);
    if wanted.is_empty() {
        return None;
    }

    let fields: Vec<String> = [candidate.popular_area.as_deref(), candidate.district.as_deref()]
        .into_iter()
        .flatten()
        .map(normalize_area)
        .filter(|f| !f.is_empty())
        .collect();

    if fields.iter().any(|f| *f == wanted) {
        return Some((weights.area_exact, MatchReason::InPreferredArea));
    }

    if fields
        .iter()
        .any(|f| f.contains(wanted.as_str()) || wanted.contains(f.as_str()))
    {
        return Some((weights.area_partial, MatchReason::NearPreferredArea));
    }

    None
}

/// Transit points for a listing near a station
///
/// Scales with `full_within / distance`, capped at `transit_proximity`.
/// An unknown distance scores at most what a known station at the edge of
/// the near band would. Only called when the buyer asked for transit access.
pub fn transit_points(candidate: &PropertyCandidate, weights: &ScoringWeights) -> Option<f64> {
    if !candidate.near_transit {
        return None;
    }

    let at_distance = |meters: f64| {
        let full_within = weights.transit_full_within_meters.max(1.0);
        weights.transit_proximity * full_within / meters.max(full_within)
    };

    let points = match candidate.transit_distance_meters {
        Some(distance) => at_distance(distance as f64),
        None => weights
            .transit_unknown_distance
            .min(at_distance(weights.transit_near_band_meters)),
    };

    Some(points)
}

/// Commute points: hyperbolic decay, so long commutes lose points ever more slowly
#[inline]
pub fn commute_points(minutes: u32, weights: &ScoringWeights) -> f64 {
    let half = weights.commute_half_minutes.max(1.0);
    weights.commute_time * half / (half + minutes as f64)
}
