//! Insight listing endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::db::repos::{
    InsightRepo, InsightWithContext, RespondentSummary, ReviewSummary, SubmissionSummary,
};
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Submission nested in an insight
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSubmission {
    pub id: Uuid,
    pub form_type: String,
    pub responses: Value,
    pub is_complete: bool,
    pub submission_date: String,
    pub updated_at: String,
}

impl From<SubmissionSummary> for InsightSubmission {
    fn from(s: SubmissionSummary) -> Self {
        Self {
            id: s.id,
            form_type: s.form_type,
            responses: s.responses,
            is_complete: s.is_complete,
            submission_date: s.submission_date.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// Respondent nested in an insight
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRespondent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub created_at: String,
}

impl From<RespondentSummary> for InsightRespondent {
    fn from(r: RespondentSummary) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            company_name: r.company_name,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Review nested in an insight. Keeps `created_at` snake_case, matching the
/// aggregate's column naming that existing clients read.
#[derive(Debug, Serialize)]
pub struct InsightReview {
    pub id: Uuid,
    pub rating: i32,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
    pub created_at: String,
}

impl From<ReviewSummary> for InsightReview {
    fn from(r: ReviewSummary) -> Self {
        Self {
            id: r.id,
            rating: r.rating,
            reaction: r.reaction,
            feedback: r.feedback,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Insight response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: i32,
    pub insight_data: Option<Value>,
    pub created_at: String,
    pub financial_insight_respondent_id: Uuid,
    pub submission: InsightSubmission,
    pub respondent: InsightRespondent,
    pub reviews: Vec<InsightReview>,
}

impl From<InsightWithContext> for InsightResponse {
    fn from(i: InsightWithContext) -> Self {
        Self {
            id: i.id,
            title: i.title,
            content: i.content,
            category: i.category,
            priority: i.priority,
            insight_data: i.data,
            created_at: i.created_at.to_rfc3339(),
            financial_insight_respondent_id: i.respondent_id,
            submission: i.submission.into(),
            respondent: i.respondent.into(),
            reviews: i.reviews.into_iter().map(InsightReview::from).collect(),
        }
    }
}

/// GET /insights - every insight with its submission, respondent, and reviews
async fn list_insights(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<InsightResponse>, ApiError> {
    let insights = InsightRepo::new(&state.pool)
        .list_with_context()
        .await
        .map_err(ApiError::database("Failed to fetch insights"))?;

    Ok(Envelope::ok(
        "All insights with complete data and reviews retrieved successfully",
        insights.into_iter().map(InsightResponse::from).collect(),
    ))
}

/// Insight routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/insights", get(list_insights))
}
