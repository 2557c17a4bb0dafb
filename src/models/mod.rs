// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BuyerQuery, InventoryHint, LeadReceipt, LeadSubmission, ListingType, MatchReason, MatchResult,
    MatchSession, PropertyCandidate, PropertyStatus, PropertyType, Purpose, ScoreEntry,
    ScoreFactor, SessionRecord, UnknownVariant,
};
pub use requests::{CaptureLeadRequest, SmartMatchRequest};
pub use responses::{
    BreakdownLine, ErrorResponse, HealthResponse, LeadResponse, MatchCard, SmartMatchResponse,
};
