use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{BuyerQuery, LeadSubmission, MatchSession, PropertyType, Purpose};

/// Request to run a Smart Match search
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SmartMatchRequest {
    pub purpose: Purpose,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[validate(range(min = 0.0))]
    pub budget_min: f64,
    #[validate(range(min = 0.0))]
    pub budget_max: f64,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub area: String,
    #[serde(default)]
    pub near_transit: bool,
    /// `th` (default) or `en`
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

impl SmartMatchRequest {
    pub fn to_query(&self) -> BuyerQuery {
        BuyerQuery {
            purpose: self.purpose,
            property_type: self.property_type,
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            area: self.area.trim().to_string(),
            near_transit: self.near_transit,
        }
    }
}

/// Contact details submitted after picking a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CaptureLeadRequest {
    #[validate(length(min = 1, max = 64))]
    pub session_id: String,
    #[validate(length(min = 1, max = 64))]
    pub property_id: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub line_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

impl CaptureLeadRequest {
    /// Trim every field and turn blank optional fields into `None`
    ///
    /// The wizard posts empty strings for untouched inputs, so this runs
    /// before validation.
    pub fn normalized(self) -> Self {
        Self {
            session_id: self.session_id.trim().to_string(),
            property_id: self.property_id.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: non_blank(self.email),
            line_id: non_blank(self.line_id),
            note: non_blank(self.note),
        }
    }

    pub fn into_submission(self, attributed: bool) -> LeadSubmission {
        LeadSubmission {
            session_id: MatchSession::from(self.session_id),
            property_id: self.property_id,
            full_name: self.full_name,
            phone: self.phone,
            email: self.email,
            line_id: self.line_id,
            note: self.note,
            attributed,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Phone numbers: 9-20 characters, digits plus `+`, `-` and spaces, at least 9 digits
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ');
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if !allowed || !(9..=20).contains(&phone.len()) || digits < 9 {
        return Err(ValidationError::new("phone"));
    }
    Ok(())
}
