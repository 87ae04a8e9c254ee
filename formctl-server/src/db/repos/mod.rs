//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs or correlated aggregates for list operations (no N+1)
//! - Handles conflicts via ON CONFLICT (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod respondents;
pub mod submissions;
pub mod insights;
pub mod reviews;

pub use respondents::{Respondent, RespondentRepo};
pub use submissions::{FormSubmission, SubmissionReceipt, SubmissionRepo};
pub use insights::{InsightRepo, InsightWithContext, RespondentSummary, ReviewSummary, SubmissionSummary};
pub use reviews::{Review, ReviewRepo, ReviewWithRespondent};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
