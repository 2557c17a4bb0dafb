use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use crate::core::CommuteModel;
use crate::models::{
    BuyerQuery, InventoryHint, LeadReceipt, LeadSubmission, ListingType, MatchSession,
    PropertyCandidate, PropertyStatus, PropertyType, SessionRecord,
};
use crate::services::inventory::{lead_activity_note, InventoryReader, LeadStore, SessionLog, StoreError};

/// Errors that can occur while connecting to PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

const CANDIDATES_QUERY: &str = r#"
    SELECT
        id::text AS id,
        title,
        slug,
        property_type::text AS property_type,
        listing_type::text AS listing_type,
        price::float8 AS price,
        original_price::float8 AS original_price,
        rental_price::float8 AS rental_price,
        original_rental_price::float8 AS original_rental_price,
        bedrooms,
        bathrooms,
        size_sqm::float8 AS size_sqm,
        popular_area,
        district,
        province,
        near_transit,
        transit_type,
        transit_station_name,
        transit_distance_meters,
        image_url,
        status::text AS status,
        latitude::float8 AS latitude,
        longitude::float8 AS longitude
    FROM properties
    WHERE status::text = 'ACTIVE'
      AND listing_type::text = ANY($1)
      AND ($2::text IS NULL OR property_type::text = $2)
    ORDER BY created_at DESC, id
    LIMIT $3
"#;

/// PostgreSQL client backing the inventory, session and lead collaborators
///
/// Reads the CRM's `properties` and `popular_areas` tables, writes
/// `leads`/`lead_activities`, and owns `smart_match_sessions`.
pub struct PostgresClient {
    pool: PgPool,
    commute: CommuteModel,
    max_candidates: i64,
}

impl PostgresClient {
    /// Connect, then run this service's migrations
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<PgPool, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
        commute: CommuteModel,
        max_candidates: usize,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        let pool = Self::connect(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await?;

        Ok(Self::with_pool(pool, commute, max_candidates))
    }

    pub fn with_pool(pool: PgPool, commute: CommuteModel, max_candidates: usize) -> Self {
        Self {
            pool,
            commute,
            max_candidates: max_candidates.max(1) as i64,
        }
    }

    /// Coordinates of the buyer's stated area
    ///
    /// Exact (case-insensitive) names win over substring matches; shorter
    /// names win among substring matches.
    async fn resolve_area(&self, area: &str) -> Result<Option<(f64, f64)>, sqlx::Error> {
        let query = r#"
            SELECT latitude::float8 AS latitude, longitude::float8 AS longitude
            FROM popular_areas
            WHERE lower(name) = lower($1)
               OR strpos(lower(name), lower($1)) > 0
               OR strpos(lower($1), lower(name)) > 0
            ORDER BY (lower(name) = lower($1)) DESC, length(name), name
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(area)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some((row.try_get("latitude")?, row.try_get("longitude")?))),
            None => Ok(None),
        }
    }

    fn candidate_from_row(
        &self,
        row: &PgRow,
        area_coords: Option<(f64, f64)>,
    ) -> Result<Option<PropertyCandidate>, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let raw_type: String = row.try_get("property_type")?;
        let raw_listing: String = row.try_get("listing_type")?;

        let property_type = match raw_type.parse::<PropertyType>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping property {}: {}", id, e);
                return Ok(None);
            }
        };
        let listing_type = match raw_listing.parse::<ListingType>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping property {}: {}", id, e);
                return Ok(None);
            }
        };

        let latitude: Option<f64> = row.try_get("latitude")?;
        let longitude: Option<f64> = row.try_get("longitude")?;
        let commute_time_minutes = match (area_coords, latitude.zip(longitude)) {
            (Some(from), Some(to)) => Some(self.commute.estimate_minutes(from, to)),
            _ => None,
        };

        let transit_distance: Option<i32> = row.try_get("transit_distance_meters")?;
        let status: String = row.try_get("status")?;

        Ok(Some(PropertyCandidate {
            id,
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            property_type,
            listing_type,
            price: row.try_get("price")?,
            original_price: row.try_get("original_price")?,
            rental_price: row.try_get("rental_price")?,
            original_rental_price: row.try_get("original_rental_price")?,
            bedrooms: row.try_get("bedrooms")?,
            bathrooms: row.try_get("bathrooms")?,
            size_sqm: row.try_get("size_sqm")?,
            popular_area: row.try_get("popular_area")?,
            district: row.try_get("district")?,
            province: row.try_get("province")?,
            commute_time_minutes,
            near_transit: row.try_get::<Option<bool>, _>("near_transit")?.unwrap_or(false),
            transit_type: row.try_get("transit_type")?,
            transit_station_name: row.try_get("transit_station_name")?,
            transit_distance_meters: transit_distance.and_then(|d| u32::try_from(d).ok()),
            image_url: row.try_get("image_url")?,
            status: PropertyStatus::parse(&status),
        }))
    }
}

#[async_trait]
impl InventoryReader for PostgresClient {
    async fn fetch_candidates(&self, hint: &InventoryHint) -> Result<Vec<PropertyCandidate>, StoreError> {
        let listing_types: Vec<String> = ListingType::compatible_with(hint.purpose)
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();

        let area_coords = match hint.area.as_deref() {
            Some(area) => self.resolve_area(area).await?,
            None => None,
        };

        if hint.area.is_some() && area_coords.is_none() {
            tracing::debug!("Area {:?} not found in popular_areas, commute left unknown", hint.area);
        }

        let rows = sqlx::query(CANDIDATES_QUERY)
            .bind(listing_types)
            .bind(hint.property_type.map(|t| t.as_str()))
            .bind(self.max_candidates)
            .fetch_all(&self.pool)
            .await?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(candidate) = self.candidate_from_row(row, area_coords)? {
                candidates.push(candidate);
            }
        }

        tracing::debug!(
            "Fetched {} candidates (purpose {}, type {:?})",
            candidates.len(),
            hint.purpose,
            hint.property_type
        );

        Ok(candidates)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl SessionLog for PostgresClient {
    async fn record_session(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO smart_match_sessions
                (id, purpose, property_type, budget_min, budget_max, area, near_transit, property_ids, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
        "#;

        sqlx::query(query)
            .bind(record.session_id.as_str())
            .bind(record.query.purpose.as_str())
            .bind(record.query.property_type.map(|t| t.as_str()))
            .bind(record.query.budget_min)
            .bind(record.query.budget_max)
            .bind(&record.query.area)
            .bind(record.query.near_transit)
            .bind(Json(&record.property_ids))
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded session {} with {} results",
            record.session_id,
            record.property_ids.len()
        );

        Ok(())
    }

    async fn get_session(&self, session_id: &MatchSession) -> Result<Option<SessionRecord>, StoreError> {
        let query = r#"
            SELECT id, purpose, property_type, budget_min, budget_max, area, near_transit, property_ids, created_at
            FROM smart_match_sessions
            WHERE id = $1
        "#;

        let Some(row) = sqlx::query(query)
            .bind(session_id.as_str())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let purpose: String = row.try_get("purpose")?;
        let property_type: Option<String> = row.try_get("property_type")?;
        let Json(property_ids): Json<Vec<String>> = row.try_get("property_ids")?;

        let purpose = purpose
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("session {}: {}", session_id, e)))?;
        let property_type = property_type
            .map(|t| t.parse::<PropertyType>())
            .transpose()
            .map_err(|e| StoreError::Corrupt(format!("session {}: {}", session_id, e)))?;

        Ok(Some(SessionRecord {
            session_id: MatchSession::from(row.try_get::<String, _>("id")?),
            query: BuyerQuery {
                purpose,
                property_type,
                budget_min: row.try_get("budget_min")?,
                budget_max: row.try_get("budget_max")?,
                area: row.try_get("area")?,
                near_transit: row.try_get("near_transit")?,
            },
            property_ids,
            created_at: row.try_get("created_at")?,
        }))
    }
}

#[async_trait]
impl LeadStore for PostgresClient {
    async fn capture_lead(&self, lead: &LeadSubmission) -> Result<LeadReceipt, StoreError> {
        let lead_id = Uuid::new_v4();
        let created_at = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO leads
                (id, full_name, phone, email, line_id, source, status, property_id, match_session_id, created_at)
            VALUES ($1, $2, $3, $4, $5, 'SMART_MATCH', 'NEW', $6, $7, $8)
            "#,
        )
        .bind(lead_id)
        .bind(&lead.full_name)
        .bind(&lead.phone)
        .bind(&lead.email)
        .bind(&lead.line_id)
        .bind(&lead.property_id)
        .bind(lead.session_id.as_str())
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO lead_activities (id, lead_id, activity_type, note, created_at)
            VALUES ($1, $2, 'NOTE', $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(lead_id)
        .bind(lead_activity_note(lead))
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Captured lead {} for property {} (session {})",
            lead_id,
            lead.property_id,
            lead.session_id
        );

        Ok(LeadReceipt { lead_id, created_at })
    }
}
