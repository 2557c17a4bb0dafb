// Integration tests for the Smart Match engine

use smart_match::core::{MatchEngine, MatchError, ScoringWeights};
use smart_match::models::{
    BuyerQuery, ListingType, MatchReason, PropertyCandidate, PropertyStatus, PropertyType,
    Purpose, ScoreEntry, ScoreFactor,
};

fn create_candidate(id: &str, property_type: PropertyType, rental_price: f64) -> PropertyCandidate {
    PropertyCandidate {
        id: id.to_string(),
        title: format!("Listing {}", id),
        slug: format!("listing-{}", id),
        property_type,
        listing_type: ListingType::Rent,
        price: None,
        original_price: None,
        rental_price: Some(rental_price),
        original_rental_price: None,
        bedrooms: Some(1),
        bathrooms: Some(1),
        size_sqm: Some(30.0),
        popular_area: None,
        district: None,
        province: Some("กรุงเทพมหานคร".to_string()),
        commute_time_minutes: None,
        near_transit: false,
        transit_type: None,
        transit_station_name: None,
        transit_distance_meters: None,
        image_url: None,
        status: PropertyStatus::Active,
    }
}

fn rent_query(near_transit: bool) -> BuyerQuery {
    BuyerQuery {
        purpose: Purpose::Rent,
        property_type: Some(PropertyType::Condo),
        budget_min: 20_000.0,
        budget_max: 30_000.0,
        area: "อ่อนนุช".to_string(),
        near_transit,
    }
}

fn mixed_inventory() -> Vec<PropertyCandidate> {
    let mut near_bts = create_candidate("near-bts", PropertyType::Condo, 25_000.0);
    near_bts.popular_area = Some("อ่อนนุช".to_string());
    near_bts.near_transit = true;
    near_bts.transit_distance_meters = Some(200);

    let mut partial_area = create_candidate("partial-area", PropertyType::Condo, 27_000.0);
    partial_area.district = Some("ซอยอ่อนนุช 17".to_string());
    partial_area.commute_time_minutes = Some(25);

    let over_budget = create_candidate("over-budget", PropertyType::Condo, 34_000.0);
    let townhouse = create_candidate("townhouse", PropertyType::Townhome, 22_000.0);

    let mut sold = create_candidate("sold", PropertyType::Condo, 24_000.0);
    sold.status = PropertyStatus::Rented;

    vec![near_bts, partial_area, over_budget, townhouse, sold]
}

#[test]
fn test_integration_end_to_end_matching() {
    let engine = MatchEngine::with_default_weights();
    let outcome = engine.find_matches(&rent_query(true), &mixed_inventory()).unwrap();

    let ids: Vec<&str> = outcome.matches.iter().map(|m| m.property_id.as_str()).collect();
    assert_eq!(ids, vec!["near-bts", "partial-area", "over-budget"]);
    assert_eq!(outcome.total_candidates, 5);

    let top = &outcome.matches[0];
    assert_eq!(top.match_score, 90);
    assert_eq!(top.effective_price, 25_000.0);
    assert_eq!(
        top.match_reasons,
        vec![MatchReason::WithinBudget, MatchReason::InPreferredArea, MatchReason::NearTransit]
    );
}

#[test]
fn test_identical_inputs_give_identical_rankings() {
    let engine = MatchEngine::with_default_weights();
    let query = rent_query(true);
    let inventory = mixed_inventory();

    let first = engine.rank(&query, &inventory).unwrap();
    let second = engine.rank(&query, &inventory).unwrap();
    assert_eq!(first, second);

    // Session ids are the only thing that differ between runs
    let a = engine.find_matches(&query, &inventory).unwrap();
    let b = engine.find_matches(&query, &inventory).unwrap();
    assert_eq!(a.matches, b.matches);
    assert_ne!(a.session_id, b.session_id);
}

#[test]
fn test_scores_stay_within_bounds() {
    let engine = MatchEngine::with_default_weights();
    let prices = [1.0, 5_000.0, 19_999.0, 20_000.0, 30_000.0, 45_000.0, 1_000_000.0];

    let mut inventory = Vec::new();
    for (i, price) in prices.iter().enumerate() {
        let mut candidate = create_candidate(&format!("p{}", i), PropertyType::Condo, *price);
        candidate.popular_area = Some("อ่อนนุช".to_string());
        candidate.near_transit = i % 2 == 0;
        candidate.transit_distance_meters = Some(50);
        candidate.commute_time_minutes = Some(0);
        inventory.push(candidate);
    }

    for result in engine.rank(&rent_query(true), &inventory).unwrap() {
        assert!(result.match_score <= 100);
        let sum: i32 = result.score_breakdown.iter().map(|e| e.points).sum();
        assert_eq!(result.match_score as i32, sum.clamp(0, 100));
        assert!(result.score_breakdown.iter().all(|e| e.points != 0));
    }
}

#[test]
fn test_budget_fit_never_increases_with_distance() {
    let engine = MatchEngine::with_default_weights();
    let query = rent_query(false);

    let budget_of = |price: f64| -> i32 {
        let result = engine
            .rank(&query, &[create_candidate("p", PropertyType::Condo, price)])
            .unwrap()
            .remove(0);
        result
            .score_breakdown
            .iter()
            .find(|e| e.label == ScoreFactor::BudgetFit)
            .map(|e| e.points)
            .unwrap_or(0)
    };

    let above: Vec<i32> = [30_000.0, 31_000.0, 33_000.0, 36_000.0, 40_000.0, 50_000.0, 90_000.0]
        .into_iter()
        .map(budget_of)
        .collect();
    assert!(above.windows(2).all(|w| w[0] >= w[1]), "{:?}", above);

    let below: Vec<i32> = [20_000.0, 19_000.0, 17_000.0, 14_000.0, 10_000.0, 2_000.0]
        .into_iter()
        .map(budget_of)
        .collect();
    assert!(below.windows(2).all(|w| w[0] >= w[1]), "{:?}", below);
}

#[test]
fn test_transit_absence_is_not_penalized_when_not_requested() {
    let engine = MatchEngine::with_default_weights();
    let query = rent_query(false);

    let mut with_transit = create_candidate("with", PropertyType::Condo, 25_000.0);
    with_transit.near_transit = true;
    with_transit.transit_distance_meters = Some(100);
    let without_transit = create_candidate("without", PropertyType::Condo, 25_000.0);

    let results = engine.rank(&query, &[with_transit, without_transit]).unwrap();
    assert_eq!(results[0].match_score, results[1].match_score);
    assert!(results
        .iter()
        .all(|r| r.score_breakdown.iter().all(|e| e.label != ScoreFactor::TransitProximity)));
}

#[test]
fn test_equal_scores_keep_inventory_order() {
    let engine = MatchEngine::with_default_weights();
    let inventory: Vec<PropertyCandidate> = ["c", "a", "d", "b"]
        .iter()
        .map(|id| create_candidate(id, PropertyType::Condo, 25_000.0))
        .collect();

    let ids: Vec<String> = engine
        .rank(&rent_query(false), &inventory)
        .unwrap()
        .into_iter()
        .map(|m| m.property_id)
        .collect();
    assert_eq!(ids, vec!["c", "a", "d", "b"]);
}

#[test]
fn test_property_type_filter() {
    let engine = MatchEngine::with_default_weights();
    let inventory = mixed_inventory();

    let condos = engine.rank(&rent_query(false), &inventory).unwrap();
    assert!(condos.iter().all(|m| m.property_type == PropertyType::Condo));

    let mut any_type = rent_query(false);
    any_type.property_type = None;
    let all = engine.rank(&any_type, &inventory).unwrap();
    assert!(all.iter().any(|m| m.property_type == PropertyType::Townhome));
    assert!(all
        .iter()
        .all(|m| m.score_breakdown.iter().all(|e| e.label != ScoreFactor::TypeMatch)));
}

#[test]
fn test_empty_inventory_still_opens_a_session() {
    let engine = MatchEngine::with_default_weights();
    let outcome = engine.find_matches(&rent_query(true), &[]).unwrap();

    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.total_candidates, 0);
    assert!(!outcome.session_id.as_str().is_empty());
}

#[test]
fn test_invalid_budget_is_rejected() {
    let engine = MatchEngine::with_default_weights();
    let mut query = rent_query(false);
    query.budget_min = 50_000.0;

    let err = engine.find_matches(&query, &mixed_inventory()).unwrap_err();
    assert!(matches!(err, MatchError::InvalidQuery(_)));
}

#[test]
fn test_in_window_listing_outranks_far_over_budget_listing() {
    let engine = MatchEngine::with_default_weights();

    let mut a = create_candidate("A", PropertyType::Condo, 25_000.0);
    a.popular_area = Some("อ่อนนุช".to_string());
    a.near_transit = true;
    a.transit_distance_meters = Some(200);

    let mut b = create_candidate("B", PropertyType::Condo, 45_000.0);
    b.popular_area = Some("บางนา".to_string());

    // B first in the snapshot, so order comes from the score alone
    let results = engine.rank(&rent_query(true), &[b, a]).unwrap();

    assert_eq!(results[0].property_id, "A");
    assert_eq!(results[0].match_score, 90);
    assert_eq!(
        results[0].score_breakdown,
        vec![
            ScoreEntry { label: ScoreFactor::BudgetFit, points: 40 },
            ScoreEntry { label: ScoreFactor::AreaMatch, points: 25 },
            ScoreEntry { label: ScoreFactor::TransitProximity, points: 20 },
            ScoreEntry { label: ScoreFactor::TypeMatch, points: 5 },
        ]
    );

    assert_eq!(results[1].property_id, "B");
    assert_eq!(results[1].match_score, 0);
    assert_eq!(
        results[1].score_breakdown,
        vec![
            ScoreEntry { label: ScoreFactor::BudgetFit, points: -7 },
            ScoreEntry { label: ScoreFactor::TypeMatch, points: 5 },
        ]
    );
    assert_eq!(results[1].match_reasons, vec![MatchReason::MatchesPropertyType]);
}

#[test]
fn test_custom_weights_change_ranking() {
    let weights = ScoringWeights {
        type_match: 0.0,
        area_exact: 60.0,
        ..ScoringWeights::default()
    };
    let engine = MatchEngine::new(weights, 1);

    let mut in_area = create_candidate("in-area", PropertyType::Condo, 35_000.0);
    in_area.popular_area = Some("อ่อนนุช".to_string());
    let in_budget = create_candidate("in-budget", PropertyType::Condo, 25_000.0);

    let results = engine.rank(&rent_query(false), &[in_budget, in_area]).unwrap();
    assert_eq!(results[0].property_id, "in-area");
    assert_eq!(results[0].match_reasons.len(), 1);
}
