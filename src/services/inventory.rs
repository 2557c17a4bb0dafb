use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use crate::models::{InventoryHint, LeadReceipt, LeadSubmission, MatchSession, PropertyCandidate, SessionRecord};

/// Errors raised by the inventory, session and lead collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Supplies the ACTIVE inventory snapshot a search is scored against
#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// Candidates for the hint, annotated with commute and transit data
    async fn fetch_candidates(&self, hint: &InventoryHint) -> Result<Vec<PropertyCandidate>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl<T> InventoryReader for Arc<T>
where
    T: InventoryReader + ?Sized,
{
    async fn fetch_candidates(&self, hint: &InventoryHint) -> Result<Vec<PropertyCandidate>, StoreError> {
        (**self).fetch_candidates(hint).await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        (**self).health_check().await
    }
}

/// Remembers which query produced which ranking
#[async_trait]
pub trait SessionLog: Send + Sync {
    async fn record_session(&self, record: &SessionRecord) -> Result<(), StoreError>;

    async fn get_session(&self, session_id: &MatchSession) -> Result<Option<SessionRecord>, StoreError>;
}

/// Persists leads captured from Smart Match result cards
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Store the lead and its activity note together
    async fn capture_lead(&self, lead: &LeadSubmission) -> Result<LeadReceipt, StoreError>;
}

/// Text of the activity note attached to a captured lead
pub fn lead_activity_note(lead: &LeadSubmission) -> String {
    let mut note = format!(
        "Smart Match lead for property {} (session {})",
        lead.property_id, lead.session_id
    );

    if !lead.attributed {
        note.push_str("\nSession not found, lead is unattributed");
    }
    if let Some(line_id) = &lead.line_id {
        note.push_str(&format!("\nLINE: {}", line_id));
    }
    if let Some(message) = &lead.note {
        note.push_str(&format!("\n{}", message));
    }

    note
}
