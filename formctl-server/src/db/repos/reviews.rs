//! Review repository
//!
//! Reviews reference a respondent directly. The respondent is looked up
//! before insert so an unknown id surfaces as NotFound rather than a
//! foreign key violation.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::models::NewReview;
use super::{DbError, RespondentRepo};

/// Review record from database
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub respondent_id: Uuid,
    pub rating: i32,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review with the reviewer's contact details for list display
#[derive(Debug, Clone)]
pub struct ReviewWithRespondent {
    pub id: Uuid,
    pub rating: i32,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub respondent_id: Uuid,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
}

/// Review repository
pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a review for an existing respondent.
    pub async fn create(&self, review: NewReview) -> Result<Review, DbError> {
        let respondent_id = RespondentRepo::new(self.pool)
            .resolve(&review.respondent_id)
            .await?;

        let row: Review = sqlx::query_as(
            r#"
            INSERT INTO reviews (respondent_id, rating, reaction, feedback)
            VALUES ($1, $2, $3, $4)
            RETURNING id, respondent_id, rating, reaction, feedback, created_at, updated_at
            "#,
        )
        .bind(respondent_id)
        .bind(review.rating.get())
        .bind(review.reaction.as_deref())
        .bind(review.feedback.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// List all reviews with respondent details, newest first.
    pub async fn list_with_respondent(&self) -> Result<Vec<ReviewWithRespondent>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                rev.id,
                rev.rating,
                rev.reaction,
                rev.feedback,
                rev.created_at,
                r.id AS respondent_id,
                r.name,
                r.email,
                r.company_name
            FROM reviews rev
            JOIN respondents r ON r.id = rev.respondent_id
            ORDER BY rev.created_at DESC, rev.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|r| ReviewWithRespondent {
                id: r.get("id"),
                rating: r.get("rating"),
                reaction: r.get("reaction"),
                feedback: r.get("feedback"),
                created_at: r.get("created_at"),
                respondent_id: r.get("respondent_id"),
                name: r.get("name"),
                email: r.get("email"),
                company_name: r.get("company_name"),
            })
            .collect();

        Ok(items)
    }

    /// List one respondent's reviews, newest first.
    ///
    /// Returns NotFound if the respondent does not exist, so callers can
    /// tell "no reviews yet" from "no such respondent".
    pub async fn list_for_respondent(&self, raw_id: &str) -> Result<Vec<Review>, DbError> {
        let respondent_id = RespondentRepo::new(self.pool).resolve(raw_id).await?;

        let rows = sqlx::query_as(
            r#"
            SELECT id, respondent_id, rating, reaction, feedback, created_at, updated_at
            FROM reviews
            WHERE respondent_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(respondent_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
