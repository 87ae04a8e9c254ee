//! Insight repository
//!
//! Reads every insight together with its submission, its respondent, and
//! that respondent's reviews in a single query.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// Submission fields carried with each insight
#[derive(Debug, Clone)]
pub struct SubmissionSummary {
    pub id: Uuid,
    pub form_type: String,
    pub responses: Value,
    pub is_complete: bool,
    pub submission_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Respondent fields carried with each insight
#[derive(Debug, Clone)]
pub struct RespondentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review as aggregated by `json_agg`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewSummary {
    pub id: Uuid,
    pub rating: i32,
    pub reaction: Option<String>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An insight with everything it hangs off
#[derive(Debug, Clone)]
pub struct InsightWithContext {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: i32,
    pub data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub respondent_id: Uuid,
    pub submission: SubmissionSummary,
    pub respondent: RespondentSummary,
    /// Reviews by the insight's respondent, newest first. Joined on the
    /// respondent, not the submission: a review rates the whole experience.
    pub reviews: Vec<ReviewSummary>,
}

impl InsightWithContext {
    fn from_row(r: &PgRow) -> Result<Self, sqlx::Error> {
        let data: Option<Json<Value>> = r.try_get("insight_data")?;
        let responses: Json<Value> = r.try_get("responses")?;
        let reviews: Json<Vec<ReviewSummary>> = r.try_get("reviews")?;

        Ok(Self {
            id: r.try_get("id")?,
            title: r.try_get("title")?,
            content: r.try_get("content")?,
            category: r.try_get("category")?,
            priority: r.try_get("priority")?,
            data: data.map(|d| d.0),
            created_at: r.try_get("created_at")?,
            respondent_id: r.try_get("fi_respondent_id")?,
            submission: SubmissionSummary {
                id: r.try_get("submission_id")?,
                form_type: r.try_get("form_type")?,
                responses: responses.0,
                is_complete: r.try_get("is_complete")?,
                submission_date: r.try_get("submission_date")?,
                updated_at: r.try_get("submission_updated_at")?,
            },
            respondent: RespondentSummary {
                id: r.try_get("respondent_id")?,
                name: r.try_get("name")?,
                email: r.try_get("email")?,
                company_name: r.try_get("company_name")?,
                created_at: r.try_get("respondent_created_at")?,
            },
            reviews: reviews.0,
        })
    }
}

/// Insight repository
pub struct InsightRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> InsightRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all insights with submission, respondent, and reviews.
    ///
    /// Ordered by respondent creation (newest first), then priority
    /// descending. Reviews come from a correlated `json_agg`, so each
    /// insight is one row (no N+1, no GROUP BY over jsonb columns).
    pub async fn list_with_context(&self) -> Result<Vec<InsightWithContext>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                fi.id,
                fi.title,
                fi.content,
                fi.category,
                fi.priority,
                fi.data AS insight_data,
                fi.created_at,
                fi.respondent_id AS fi_respondent_id,
                fs.id AS submission_id,
                fs.form_type,
                fs.responses,
                fs.is_complete,
                fs.submission_date,
                fs.updated_at AS submission_updated_at,
                r.id AS respondent_id,
                r.name,
                r.email,
                r.company_name,
                r.created_at AS respondent_created_at,
                COALESCE(
                    (
                        SELECT json_agg(
                            json_build_object(
                                'id', rev.id,
                                'rating', rev.rating,
                                'reaction', rev.reaction,
                                'feedback', rev.feedback,
                                'created_at', rev.created_at
                            )
                            ORDER BY rev.created_at DESC
                        )
                        FROM reviews rev
                        WHERE rev.respondent_id = r.id
                    ),
                    '[]'::json
                ) AS reviews
            FROM financial_insights fi
            JOIN form_submissions fs ON fs.id = fi.submission_id
            JOIN respondents r ON r.id = fi.respondent_id
            ORDER BY r.created_at DESC, fi.priority DESC, fi.created_at DESC, fi.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let insights = rows
            .iter()
            .map(InsightWithContext::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::{fresh_respondent, pool};
    use crate::db::repos::{ReviewRepo, SubmissionRepo};
    use crate::models::{InsightDraft, NewReview, NewSubmission, SampleInsightGenerator};
    use serde_json::json;

    #[test]
    fn review_summary_parses_postgres_json() {
        // Shape produced by json_build_object, with a non-UTC session offset
        let raw = json!({
            "id": "6f1c7c1e-8a4e-4b8f-9a57-0d9a3c1f2b10",
            "rating": 4,
            "reaction": "Great",
            "feedback": null,
            "created_at": "2024-05-01T15:30:00.123456+05:30"
        });
        let review: ReviewSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(review.rating, 4);
        assert_eq!(review.reaction.as_deref(), Some("Great"));
        assert_eq!(review.feedback, None);
        assert_eq!(review.created_at.to_rfc3339(), "2024-05-01T10:00:00.123456+00:00");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn orders_by_respondent_then_priority_and_nests_reviews() {
        let pool = pool().await;
        let tiers = |_: &str, _: &Value| {
            [2, 5, 1]
                .into_iter()
                .map(|priority| InsightDraft {
                    title: format!("p{priority}"),
                    content: String::new(),
                    category: "Finance".into(),
                    priority,
                    data: None,
                })
                .collect::<Vec<_>>()
        };

        let older = fresh_respondent("Older");
        let newer = fresh_respondent("Newer");
        let submissions = SubmissionRepo::new(&pool);
        let old_receipt = submissions
            .create(NewSubmission::new(older, "risk", Some(json!({}))).unwrap(), &tiers)
            .await
            .unwrap();
        let new_receipt = submissions
            .create(
                NewSubmission::new(newer, "risk", Some(json!({}))).unwrap(),
                &SampleInsightGenerator,
            )
            .await
            .unwrap();

        let review = NewReview::new(
            Some(&old_receipt.respondent_id.to_string()),
            Some(&json!(5)),
            Some("Loved it"),
            None,
        )
        .unwrap();
        let stored = ReviewRepo::new(&pool).create(review).await.unwrap();

        let ours: Vec<_> = InsightRepo::new(&pool)
            .list_with_context()
            .await
            .unwrap()
            .into_iter()
            .filter(|i| {
                i.respondent_id == old_receipt.respondent_id
                    || i.respondent_id == new_receipt.respondent_id
            })
            .collect();

        let order: Vec<_> = ours.iter().map(|i| (i.respondent_id, i.priority)).collect();
        assert_eq!(
            order,
            vec![
                (new_receipt.respondent_id, 1),
                (old_receipt.respondent_id, 5),
                (old_receipt.respondent_id, 2),
                (old_receipt.respondent_id, 1),
            ]
        );

        assert!(ours[0].reviews.is_empty());
        for insight in &ours[1..] {
            assert_eq!(insight.reviews.len(), 1);
            assert_eq!(insight.reviews[0].id, stored.id);
            assert_eq!(insight.submission.id, old_receipt.submission_id);
        }
    }
}
