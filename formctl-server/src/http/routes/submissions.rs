//! Form submission endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::repos::{SubmissionReceipt, SubmissionRepo};
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{InsightDraft, NewRespondent, NewSubmission, ValidationError};

/// Submit form request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub form_type: Option<String>,
    pub responses: Option<Value>,
}

impl SubmitFormRequest {
    fn validate(self) -> Result<NewSubmission, ValidationError> {
        let respondent = NewRespondent::new(
            self.name.as_deref().unwrap_or_default(),
            self.email.as_deref().unwrap_or_default(),
            self.company_name.as_deref(),
        )?;

        NewSubmission::new(
            respondent,
            self.form_type.as_deref().unwrap_or_default(),
            self.responses,
        )
    }
}

/// Submission response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub submission_id: Uuid,
    pub respondent_id: Uuid,
    pub insights: Vec<InsightDraft>,
}

impl From<SubmissionReceipt> for SubmissionResponse {
    fn from(r: SubmissionReceipt) -> Self {
        Self {
            submission_id: r.submission_id,
            respondent_id: r.respondent_id,
            insights: r.insights,
        }
    }
}

/// POST /submissions - store a submission and generate its insights
async fn submit_form(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SubmitFormRequest>,
) -> Result<Envelope<SubmissionResponse>, ApiError> {
    let submission = req.validate()?;

    let receipt = SubmissionRepo::new(&state.pool)
        .create(submission, state.insights.as_ref())
        .await
        .map_err(ApiError::database("Failed to submit form"))?;

    tracing::info!(
        submission_id = %receipt.submission_id,
        respondent_id = %receipt.respondent_id,
        "form submitted"
    );

    Ok(Envelope::created(
        "Form submitted successfully",
        vec![SubmissionResponse::from(receipt)],
    ))
}

/// Submission routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/submissions", post(submit_form))
}
