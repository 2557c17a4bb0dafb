// Unit tests for Smart Match

use smart_match::core::{
    commute::{haversine_km, CommuteModel},
    filters::{effective_price, is_eligible, validate_query},
    reasons::select_reasons,
    scoring::{budget_points, calculate_match_score, commute_points, transit_points, Contribution},
    ScoringWeights,
};
use smart_match::i18n::{factor_label, reason_text, Locale};
use smart_match::models::{
    BuyerQuery, ListingType, MatchReason, PropertyCandidate, PropertyStatus, PropertyType,
    Purpose, ScoreFactor,
};

fn create_test_candidate(id: &str, rental_price: f64) -> PropertyCandidate {
    PropertyCandidate {
        id: id.to_string(),
        title: format!("Condo {}", id),
        slug: format!("condo-{}", id),
        property_type: PropertyType::Condo,
        listing_type: ListingType::Rent,
        price: None,
        original_price: None,
        rental_price: Some(rental_price),
        original_rental_price: None,
        bedrooms: Some(1),
        bathrooms: Some(1),
        size_sqm: Some(32.0),
        popular_area: Some("อ่อนนุช".to_string()),
        district: Some("สวนหลวง".to_string()),
        province: Some("กรุงเทพมหานคร".to_string()),
        commute_time_minutes: None,
        near_transit: true,
        transit_type: Some("BTS".to_string()),
        transit_station_name: Some("On Nut".to_string()),
        transit_distance_meters: Some(250),
        image_url: None,
        status: PropertyStatus::Active,
    }
}

fn create_test_query() -> BuyerQuery {
    BuyerQuery {
        purpose: Purpose::Rent,
        property_type: Some(PropertyType::Condo),
        budget_min: 15_000.0,
        budget_max: 30_000.0,
        area: "อ่อนนุช".to_string(),
        near_transit: true,
    }
}

#[test]
fn test_validate_query_accepts_open_budget() {
    let mut query = create_test_query();
    query.budget_min = 0.0;
    query.budget_max = 0.0;
    assert!(validate_query(&query).is_ok());
}

#[test]
fn test_validate_query_rejects_inverted_budget() {
    let mut query = create_test_query();
    query.budget_min = 40_000.0;
    assert!(validate_query(&query).is_err());
}

#[test]
fn test_validate_query_rejects_nan() {
    let mut query = create_test_query();
    query.budget_max = f64::NAN;
    assert!(validate_query(&query).is_err());
}

#[test]
fn test_effective_price_falls_back_to_original() {
    let mut candidate = create_test_candidate("p1", 0.0);
    candidate.original_rental_price = Some(18_000.0);
    assert_eq!(effective_price(&candidate, Purpose::Rent), Some(18_000.0));
    assert_eq!(effective_price(&candidate, Purpose::Buy), None);
}

#[test]
fn test_sold_listing_not_eligible() {
    let mut candidate = create_test_candidate("p1", 20_000.0);
    candidate.status = PropertyStatus::Sold;
    assert!(!is_eligible(&candidate, &create_test_query()));
}

#[test]
fn test_budget_points_shape() {
    let weights = ScoringWeights::default();

    let inside = budget_points(20_000.0, 15_000.0, 30_000.0, &weights).unwrap();
    assert_eq!(inside, (40.0, Some(MatchReason::WithinBudget)));

    // 10% over budget keeps two thirds of the points
    let (close, reason) = budget_points(33_000.0, 15_000.0, 30_000.0, &weights).unwrap();
    assert!((close - 26.666).abs() < 0.01);
    assert_eq!(reason, Some(MatchReason::CloseToBudget));

    // Twice the tolerance and beyond is the full penalty
    let (far, reason) = budget_points(100_000.0, 15_000.0, 30_000.0, &weights).unwrap();
    assert_eq!(far, -10.0);
    assert_eq!(reason, None);

    assert!(budget_points(20_000.0, 0.0, 0.0, &weights).is_none());
}

#[test]
fn test_transit_points_distance_curve() {
    let weights = ScoringWeights::default();
    let mut candidate = create_test_candidate("p1", 20_000.0);

    candidate.transit_distance_meters = Some(100);
    assert_eq!(transit_points(&candidate, &weights), Some(20.0));

    candidate.transit_distance_meters = Some(600);
    assert_eq!(transit_points(&candidate, &weights), Some(10.0));

    candidate.transit_distance_meters = None;
    assert_eq!(transit_points(&candidate, &weights), Some(6.0));

    candidate.near_transit = false;
    assert_eq!(transit_points(&candidate, &weights), None);
}

#[test]
fn test_commute_points_hyperbolic() {
    let weights = ScoringWeights::default();
    assert_eq!(commute_points(0, &weights), 10.0);
    assert_eq!(commute_points(30, &weights), 5.0);
    assert!(commute_points(90, &weights) > 0.0);
}

#[test]
fn test_calculate_match_score_perfect_candidate() {
    let mut candidate = create_test_candidate("p1", 20_000.0);
    candidate.commute_time_minutes = Some(0);

    let card = calculate_match_score(&candidate, &create_test_query(), &ScoringWeights::default());
    assert_eq!(card.score, 100);

    let factors: Vec<ScoreFactor> = card.contributions.iter().map(|c| c.factor).collect();
    assert_eq!(
        factors,
        vec![
            ScoreFactor::BudgetFit,
            ScoreFactor::AreaMatch,
            ScoreFactor::TransitProximity,
            ScoreFactor::CommuteTime,
            ScoreFactor::TypeMatch,
        ]
    );
}

#[test]
fn test_select_reasons_orders_by_points() {
    let contributions = vec![
        Contribution {
            factor: ScoreFactor::TypeMatch,
            points: 5,
            reason: Some(MatchReason::MatchesPropertyType),
        },
        Contribution {
            factor: ScoreFactor::BudgetFit,
            points: 40,
            reason: Some(MatchReason::WithinBudget),
        },
        Contribution {
            factor: ScoreFactor::AreaMatch,
            points: 25,
            reason: Some(MatchReason::InPreferredArea),
        },
    ];

    assert_eq!(
        select_reasons(&contributions, 2),
        vec![MatchReason::WithinBudget, MatchReason::InPreferredArea]
    );
}

#[test]
fn test_haversine_siam_to_on_nut() {
    // Siam to On Nut is roughly 7 km as the crow flies
    let distance = haversine_km(13.7456, 100.5341, 13.7057, 100.6010);
    assert!(distance > 6.0 && distance < 10.0);
}

#[test]
fn test_commute_model_adds_overhead() {
    let model = CommuteModel::default();
    assert_eq!(model.estimate_minutes((13.7456, 100.5341), (13.7456, 100.5341)), 10);
}

#[test]
fn test_locale_rendering() {
    assert_eq!(Locale::parse(Some("en")), Locale::En);
    assert_eq!(Locale::parse(None), Locale::Th);
    assert!(!factor_label(ScoreFactor::BudgetFit, Locale::En).is_empty());
    assert_ne!(
        reason_text(MatchReason::NearTransit, Locale::Th),
        reason_text(MatchReason::NearTransit, Locale::En)
    );
}
