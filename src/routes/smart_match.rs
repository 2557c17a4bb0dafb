use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::{validate_query, MatchEngine};
use crate::i18n::Locale;
use crate::models::{
    CaptureLeadRequest, ErrorResponse, HealthResponse, InventoryHint, LeadResponse, MatchCard,
    MatchSession, SessionRecord, SmartMatchRequest, SmartMatchResponse,
};
use crate::services::{CacheKey, CacheManager, InventoryReader, LeadStore, SessionLog};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<dyn InventoryReader>,
    pub sessions: Arc<dyn SessionLog>,
    pub leads: Arc<dyn LeadStore>,
    pub cache: Arc<CacheManager>,
    pub engine: MatchEngine,
    pub matching: MatchingSettings,
}

/// Configure all Smart Match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/smart-match/search", web::post().to(search))
        .route("/smart-match/leads", web::post().to(capture_lead))
        .route("/smart-match/sessions/{session_id}", web::get().to(get_session))
        .route("/smart-match/cache", web::delete().to(invalidate_inventory_cache));
}

fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.inventory.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Smart Match search endpoint
///
/// POST /api/v1/smart-match/search
///
/// Request body:
/// ```json
/// {
///   "purpose": "RENT",
///   "propertyType": "CONDO",
///   "budgetMin": 15000,
///   "budgetMax": 30000,
///   "area": "อ่อนนุช",
///   "nearTransit": true,
///   "locale": "th",
///   "limit": 20
/// }
/// ```
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SmartMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let query = req.to_query();

    // Fail fast before touching the inventory
    if let Err(e) = validate_query(&query) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid query", e.to_string());
    }

    let hint = InventoryHint::from(&query);
    let candidates = match state.inventory.fetch_candidates(&hint).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to fetch inventory for {:?}: {}", hint, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch inventory",
                e.to_string(),
            );
        }
    };

    let outcome = match state.engine.find_matches(&query, &candidates) {
        Ok(outcome) => outcome,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, "Invalid query", e.to_string()),
    };

    let record = SessionRecord {
        session_id: outcome.session_id.clone(),
        query,
        property_ids: outcome.matches.iter().map(|m| m.property_id.clone()).collect(),
        created_at: chrono::Utc::now(),
    };

    // The buyer still gets results; leads on this session land unattributed
    if let Err(e) = state.sessions.record_session(&record).await {
        tracing::warn!("Failed to record session {}: {}", outcome.session_id, e);
    }

    let locale = Locale::parse(req.locale.as_deref());
    let limit = req
        .limit
        .unwrap_or(state.matching.default_limit)
        .min(state.matching.max_limit) as usize;
    let total_results = outcome.matches.len();

    let response = SmartMatchResponse {
        session_id: outcome.session_id.to_string(),
        matches: outcome
            .matches
            .into_iter()
            .take(limit)
            .map(|m| MatchCard::render(m, locale))
            .collect(),
        total_results,
        total_candidates: outcome.total_candidates,
    };

    tracing::info!(
        "Session {}: returning {} of {} matches (from {} candidates)",
        response.session_id,
        response.matches.len(),
        total_results,
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

/// Lead capture endpoint
///
/// POST /api/v1/smart-match/leads
///
/// A recorded session must have ranked the property. A session that cannot
/// be found (its record may have failed to write during the search) still
/// gets the lead stored, flagged as unattributed.
async fn capture_lead(
    state: web::Data<AppState>,
    req: web::Json<CaptureLeadRequest>,
) -> impl Responder {
    let req = req.into_inner().normalized();

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let session_id = MatchSession::from(req.session_id.clone());
    let attributed = match state.sessions.get_session(&session_id).await {
        Ok(Some(session)) => {
            if !session.property_ids.contains(&req.property_id) {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "Property not in session",
                    format!("Property {} was not a result of session {}", req.property_id, session_id),
                );
            }
            true
        }
        Ok(None) => {
            tracing::warn!("Session {} not found, storing lead as unattributed", session_id);
            false
        }
        Err(e) => {
            tracing::warn!("Failed to load session {} ({}), storing lead as unattributed", session_id, e);
            false
        }
    };

    let submission = req.into_submission(attributed);
    match state.leads.capture_lead(&submission).await {
        Ok(receipt) => HttpResponse::Created().json(LeadResponse {
            lead_id: receipt.lead_id.to_string(),
            session_id: submission.session_id.to_string(),
            property_id: submission.property_id,
            attributed,
            created_at: receipt.created_at,
        }),
        Err(e) => {
            tracing::error!("Failed to capture lead for session {}: {}", submission.session_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to capture lead",
                e.to_string(),
            )
        }
    }
}

/// Session lookup for attribution
///
/// GET /api/v1/smart-match/sessions/{sessionId}
async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = MatchSession::from(path.into_inner());

    match state.sessions.get_session(&session_id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "Unknown session",
            format!("No Smart Match session {}", session_id),
        ),
        Err(e) => {
            tracing::error!("Failed to load session {}: {}", session_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load session",
                e.to_string(),
            )
        }
    }
}

/// Drop cached inventory snapshots after listings change
///
/// DELETE /api/v1/smart-match/cache
async fn invalidate_inventory_cache(state: web::Data<AppState>) -> impl Responder {
    match state.cache.invalidate_pattern(CacheKey::INVENTORY_PATTERN).await {
        Ok(()) => HttpResponse::Ok().json(state.cache.stats()),
        Err(e) => {
            tracing::error!("Failed to invalidate inventory cache: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to invalidate cache",
                e.to_string(),
            )
        }
    }
}
