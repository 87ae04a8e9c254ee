//! Review endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::repos::{Review, ReviewRepo, ReviewWithRespondent};
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, RespondentIdParam};
use crate::http::server::AppState;
use crate::models::NewReview;

/// Submit review request.
///
/// `rating` stays raw JSON so a missing, zero, or non-integer rating gets
/// its own 400 message rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub respondent_id: Option<String>,
    pub rating: Option<Value>,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
}

/// Review row as stored
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub respondent_id: Uuid,
    pub rating: i32,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: String,
    #[serde(rename = "updated_at")]
    pub updated_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            respondent_id: r.respondent_id,
            rating: r.rating,
            reaction: r.reaction,
            feedback: r.feedback,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

/// Reviewer summary in the review list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
}

/// Review list item
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListItem {
    pub id: Uuid,
    pub rating: i32,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
    pub created_at: String,
    pub respondent: ReviewerResponse,
}

impl From<ReviewWithRespondent> for ReviewListItem {
    fn from(r: ReviewWithRespondent) -> Self {
        Self {
            id: r.id,
            rating: r.rating,
            reaction: r.reaction,
            feedback: r.feedback,
            created_at: r.created_at.to_rfc3339(),
            respondent: ReviewerResponse {
                id: r.respondent_id,
                name: r.name,
                email: r.email,
                company_name: r.company_name,
            },
        }
    }
}

/// POST /reviews - rate the experience
async fn submit_review(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SubmitReviewRequest>,
) -> Result<Envelope<ReviewResponse>, ApiError> {
    let review = NewReview::new(
        req.respondent_id.as_deref(),
        req.rating.as_ref(),
        req.reaction.as_deref(),
        req.feedback.as_deref(),
    )?;

    let review = ReviewRepo::new(&state.pool)
        .create(review)
        .await
        .map_err(ApiError::database("Failed to submit review"))?;

    tracing::info!(review_id = %review.id, rating = review.rating, "review submitted");

    Ok(Envelope::created(
        "Review submitted successfully",
        vec![ReviewResponse::from(review)],
    ))
}

/// GET /reviews - all reviews with reviewer details
async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<ReviewListItem>, ApiError> {
    let reviews = ReviewRepo::new(&state.pool)
        .list_with_respondent()
        .await
        .map_err(ApiError::database("Failed to fetch reviews"))?;

    Ok(Envelope::ok(
        "All reviews retrieved successfully",
        reviews.into_iter().map(ReviewListItem::from).collect(),
    ))
}

/// GET /reviews/{respondent_id} - one respondent's reviews
async fn respondent_reviews(
    State(state): State<Arc<AppState>>,
    RespondentIdParam(respondent_id): RespondentIdParam,
) -> Result<Envelope<ReviewResponse>, ApiError> {
    let reviews = ReviewRepo::new(&state.pool)
        .list_for_respondent(&respondent_id)
        .await
        .map_err(ApiError::database("Failed to fetch respondent reviews"))?;

    Ok(Envelope::ok(
        format!("Successfully retrieved reviews for respondent {}", respondent_id),
        reviews.into_iter().map(ReviewResponse::from).collect(),
    ))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reviews", get(list_reviews).post(submit_review))
        .route("/reviews/{respondent_id}", get(respondent_reviews))
}
