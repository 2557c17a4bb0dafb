use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raised when a stored enum column holds a value this service does not know
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// What the buyer intends to do with the property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purpose {
    Buy,
    Rent,
    Invest,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Buy => "BUY",
            Purpose::Rent => "RENT",
            Purpose::Invest => "INVEST",
        }
    }

    /// RENT budgets bound the monthly rent, everything else the sale price
    pub fn uses_rental_price(&self) -> bool {
        matches!(self, Purpose::Rent)
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Purpose::Buy),
            "RENT" => Ok(Purpose::Rent),
            "INVEST" => Ok(Purpose::Invest),
            other => Err(UnknownVariant::new("purpose", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Condo,
    House,
    OfficeBuilding,
    Townhome,
    Land,
    Warehouse,
    CommercialBuilding,
    Other,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Condo => "CONDO",
            PropertyType::House => "HOUSE",
            PropertyType::OfficeBuilding => "OFFICE_BUILDING",
            PropertyType::Townhome => "TOWNHOME",
            PropertyType::Land => "LAND",
            PropertyType::Warehouse => "WAREHOUSE",
            PropertyType::CommercialBuilding => "COMMERCIAL_BUILDING",
            PropertyType::Other => "OTHER",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONDO" => Ok(PropertyType::Condo),
            "HOUSE" => Ok(PropertyType::House),
            "OFFICE_BUILDING" => Ok(PropertyType::OfficeBuilding),
            "TOWNHOME" => Ok(PropertyType::Townhome),
            "LAND" => Ok(PropertyType::Land),
            "WAREHOUSE" => Ok(PropertyType::Warehouse),
            "COMMERCIAL_BUILDING" => Ok(PropertyType::CommercialBuilding),
            "OTHER" => Ok(PropertyType::Other),
            other => Err(UnknownVariant::new("property type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingType {
    Sale,
    Rent,
    SaleAndRent,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sale => "SALE",
            ListingType::Rent => "RENT",
            ListingType::SaleAndRent => "SALE_AND_RENT",
        }
    }

    /// Listing types that can satisfy a buyer with the given purpose
    pub fn compatible_with(purpose: Purpose) -> &'static [ListingType] {
        match purpose {
            Purpose::Rent => &[ListingType::Rent, ListingType::SaleAndRent],
            Purpose::Buy | Purpose::Invest => &[ListingType::Sale, ListingType::SaleAndRent],
        }
    }
}

impl FromStr for ListingType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SALE" => Ok(ListingType::Sale),
            "RENT" => Ok(ListingType::Rent),
            "SALE_AND_RENT" => Ok(ListingType::SaleAndRent),
            other => Err(UnknownVariant::new("listing type", other)),
        }
    }
}

/// Listing lifecycle status as stored by the CRM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Active,
    Draft,
    Reserved,
    Sold,
    Rented,
    #[serde(other)]
    Inactive,
}

impl PropertyStatus {
    /// Unknown statuses are never eligible, so they collapse to `Inactive`
    pub fn parse(s: &str) -> Self {
        match s {
            "ACTIVE" => PropertyStatus::Active,
            "DRAFT" => PropertyStatus::Draft,
            "RESERVED" => PropertyStatus::Reserved,
            "SOLD" => PropertyStatus::Sold,
            "RENTED" => PropertyStatus::Rented,
            _ => PropertyStatus::Inactive,
        }
    }
}

fn default_status() -> PropertyStatus {
    PropertyStatus::Active
}

/// Buyer answers collected by the Smart Match wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerQuery {
    pub purpose: Purpose,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    pub budget_min: f64,
    pub budget_max: f64,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub near_transit: bool,
}

/// Inventory snapshot row handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCandidate {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub rental_price: Option<f64>,
    #[serde(default)]
    pub original_rental_price: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub size_sqm: Option<f64>,
    #[serde(default)]
    pub popular_area: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub commute_time_minutes: Option<u32>,
    #[serde(default)]
    pub near_transit: bool,
    #[serde(default)]
    pub transit_type: Option<String>,
    #[serde(default)]
    pub transit_station_name: Option<String>,
    #[serde(default)]
    pub transit_distance_meters: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_status")]
    pub status: PropertyStatus,
}

impl PropertyCandidate {
    pub fn is_active(&self) -> bool {
        self.status == PropertyStatus::Active
    }
}

/// Language-neutral identifier of a scoring factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreFactor {
    BudgetFit,
    AreaMatch,
    TransitProximity,
    CommuteTime,
    TypeMatch,
}

impl ScoreFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreFactor::BudgetFit => "BUDGET_FIT",
            ScoreFactor::AreaMatch => "AREA_MATCH",
            ScoreFactor::TransitProximity => "TRANSIT_PROXIMITY",
            ScoreFactor::CommuteTime => "COMMUTE_TIME",
            ScoreFactor::TypeMatch => "TYPE_MATCH",
        }
    }
}

/// One line of a score breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub label: ScoreFactor,
    pub points: i32,
}

/// Language-neutral reason code shown on a result card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchReason {
    WithinBudget,
    CloseToBudget,
    InPreferredArea,
    NearPreferredArea,
    NearTransit,
    ShortCommute,
    MatchesPropertyType,
}

/// Ranked candidate with its score explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub property_id: String,
    pub title: String,
    pub slug: String,
    pub property_type: PropertyType,
    pub listing_type: ListingType,
    /// Price the budget was compared against
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
    pub score_breakdown: Vec<ScoreEntry>,
    pub match_reasons: Vec<MatchReason>,
}

/// Opaque id tying a search to any lead captured from its results
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchSession(String);

impl MatchSession {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for MatchSession {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse pre-filter handed to the inventory collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryHint {
    pub purpose: Purpose,
    pub property_type: Option<PropertyType>,
    pub area: Option<String>,
}

impl From<&BuyerQuery> for InventoryHint {
    fn from(query: &BuyerQuery) -> Self {
        let area = query.area.trim();
        Self {
            purpose: query.purpose,
            property_type: query.property_type,
            area: (!area.is_empty()).then(|| area.to_string()),
        }
    }
}

/// Stored record of one search, used for lead attribution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: MatchSession,
    pub query: BuyerQuery,
    pub property_ids: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Contact details submitted from a result card
#[derive(Debug, Clone)]
pub struct LeadSubmission {
    pub session_id: MatchSession,
    pub property_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub line_id: Option<String>,
    pub note: Option<String>,
    /// False when no recorded session backs `session_id`
    pub attributed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadReceipt {
    pub lead_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
