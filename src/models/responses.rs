use serde::{Deserialize, Serialize};
use crate::i18n::{self, Locale};
use crate::models::domain::{ListingType, MatchReason, MatchResult, PropertyType, ScoreFactor};

/// One rendered line of a score breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: ScoreFactor,
    pub text: String,
    pub points: i32,
}

/// Result card as rendered for the wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCard {
    pub property_id: String,
    pub title: String,
    pub slug: String,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    pub effective_price: f64,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub rental_price: Option<f64>,
    pub original_rental_price: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub size_sqm: Option<f64>,
    pub popular_area: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub commute_time_minutes: Option<u32>,
    pub near_transit: bool,
    pub transit_type: Option<String>,
    pub transit_station_name: Option<String>,
    pub transit_distance_meters: Option<u32>,
    pub image_url: Option<String>,
    pub match_score: u8,
    pub score_breakdown: Vec<BreakdownLine>,
    pub match_reasons: Vec<String>,
    pub reason_codes: Vec<MatchReason>,
}

impl MatchCard {
    pub fn render(result: MatchResult, locale: Locale) -> Self {
        let score_breakdown = result
            .score_breakdown
            .iter()
            .map(|entry| BreakdownLine {
                label: entry.label,
                text: i18n::factor_label(entry.label, locale).to_string(),
                points: entry.points,
            })
            .collect();

        let match_reasons = result
            .match_reasons
            .iter()
            .map(|reason| i18n::reason_text(*reason, locale).to_string())
            .collect();

        Self {
            property_id: result.property_id,
            title: result.title,
            slug: result.slug,
            property_type: result.property_type,
            listing_type: result.listing_type,
            effective_price: result.effective_price,
            price: result.price,
            original_price: result.original_price,
            rental_price: result.rental_price,
            original_rental_price: result.original_rental_price,
            bedrooms: result.bedrooms,
            bathrooms: result.bathrooms,
            size_sqm: result.size_sqm,
            popular_area: result.popular_area,
            district: result.district,
            province: result.province,
            commute_time_minutes: result.commute_time_minutes,
            near_transit: result.near_transit,
            transit_type: result.transit_type,
            transit_station_name: result.transit_station_name,
            transit_distance_meters: result.transit_distance_meters,
            image_url: result.image_url,
            match_score: result.match_score,
            score_breakdown,
            match_reasons,
            reason_codes: result.match_reasons,
        }
    }
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMatchResponse {
    pub session_id: String,
    pub matches: Vec<MatchCard>,
    /// Ranked matches before presentation truncation
    pub total_results: usize,
    pub total_candidates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub lead_id: String,
    pub session_id: String,
    pub property_id: String,
    /// False when the lead could not be tied to a recorded search
    pub attributed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
