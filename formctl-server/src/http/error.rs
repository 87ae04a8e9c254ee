//! API error types with IntoResponse
//!
//! Errors are converted to envelope responses with appropriate status codes.
//! Database failures are logged server-side; clients only see the handler's
//! sanitized message.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::db::repos::DbError;
use crate::http::envelope::Envelope;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Request could not be extracted (malformed JSON, body too large, ...)
    Rejected { status: StatusCode, message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database error (500, logged). `context` is what the client sees.
    Database { context: &'static str, source: DbError },

    /// Request exceeded the configured time budget (408)
    Timeout { limit: Duration },
}

impl ApiError {
    /// Map a repository error, keeping NotFound as 404 and reporting
    /// anything else as a 500 with the given message.
    ///
    /// ```ignore
    /// repo.create(review).await.map_err(ApiError::database("Failed to submit review"))?;
    /// ```
    pub fn database(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |e| match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            source => Self::Database { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::NotFound { resource, .. } => format!("{} not found", capitalize(resource)),
            Self::Database { context, .. } => (*context).to_owned(),
            Self::Timeout { limit } => {
                format!("Request timed out after {} seconds", limit.as_secs())
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database { context, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, "{}", context);
            }
            Self::NotFound { resource, id } => {
                tracing::debug!(resource, id = %id, "not found");
            }
            Self::Timeout { limit } => {
                tracing::warn!(limit_secs = limit.as_secs(), "request timed out");
            }
            Self::Validation(_) | Self::Rejected { .. } => {}
        }

        Envelope::<Value>::failure(self.status(), self.message()).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
