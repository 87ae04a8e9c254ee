//! Submission repository
//!
//! A submission is written together with its respondent and its insights:
//! - respondent upsert by email
//! - submission insert with verbatim jsonb responses
//! - one insight row per generated draft
//!
//! all inside a single transaction, so a failure leaves nothing behind.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{InsightDraft, InsightGenerator, NewSubmission};
use super::{DbError, RespondentRepo};

/// Form submission record from database
#[derive(Debug, Clone, FromRow)]
pub struct FormSubmission {
    pub id: Uuid,
    pub respondent_id: Uuid,
    pub form_type: String,
    pub responses: Json<Value>,
    pub is_complete: bool,
    pub submission_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a successful submission reports back
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub respondent_id: Uuid,
    pub insights: Vec<InsightDraft>,
}

/// Submission repository
pub struct SubmissionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SubmissionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a submission and its generated insights (atomic).
    pub async fn create(
        &self,
        submission: NewSubmission,
        generator: &dyn InsightGenerator,
    ) -> Result<SubmissionReceipt, DbError> {
        let mut tx = self.pool.begin().await?;

        let respondent = RespondentRepo::upsert_by_email(&mut *tx, &submission.respondent).await?;

        let (submission_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO form_submissions (respondent_id, form_type, responses, is_complete)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id
            "#,
        )
        .bind(respondent.id)
        .bind(&submission.form_type)
        .bind(Json(&submission.responses))
        .fetch_one(&mut *tx)
        .await?;

        let insights = generator.generate(&submission.form_type, &submission.responses);

        for insight in &insights {
            sqlx::query(
                r#"
                INSERT INTO financial_insights
                    (submission_id, respondent_id, title, content, category, priority, data)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(submission_id)
            .bind(respondent.id)
            .bind(&insight.title)
            .bind(&insight.content)
            .bind(&insight.category)
            .bind(insight.priority)
            .bind(insight.data.as_ref().map(Json))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            %submission_id,
            respondent_id = %respondent.id,
            insights = insights.len(),
            "stored form submission"
        );

        Ok(SubmissionReceipt {
            submission_id,
            respondent_id: respondent.id,
            insights,
        })
    }

    /// Get a single submission by ID.
    #[cfg(test)]
    pub(crate) async fn get(&self, id: Uuid) -> Result<FormSubmission, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, respondent_id, form_type, responses, is_complete,
                   submission_date, updated_at
            FROM form_submissions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "submission",
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::{fresh_respondent, pool};
    use crate::models::SampleInsightGenerator;
    use serde_json::json;

    fn submission(respondent: crate::models::NewRespondent, responses: Value) -> NewSubmission {
        NewSubmission::new(respondent, "risk", Some(responses)).unwrap()
    }

    async fn respondent_rows(pool: &PgPool, email: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM respondents WHERE email = $1")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn repeated_submissions_share_one_respondent() {
        let pool = pool().await;
        let respondent = fresh_respondent("Ada");
        let repo = SubmissionRepo::new(&pool);

        let a = repo
            .create(submission(respondent.clone(), json!({"q1": "yes"})), &SampleInsightGenerator)
            .await
            .unwrap();
        let b = repo
            .create(submission(respondent.clone(), json!({"q1": "no"})), &SampleInsightGenerator)
            .await
            .unwrap();

        assert_eq!(a.respondent_id, b.respondent_id);
        assert_ne!(a.submission_id, b.submission_id);
        assert_eq!(respondent_rows(&pool, respondent.email.as_str()).await, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_first_submissions_share_one_respondent() {
        let pool = pool().await;
        let respondent = fresh_respondent("Race");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pool = pool.clone();
                let s = submission(respondent.clone(), json!({ "attempt": i }));
                tokio::spawn(async move {
                    SubmissionRepo::new(&pool)
                        .create(s, &SampleInsightGenerator)
                        .await
                        .expect("submission failed")
                        .respondent_id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.expect("task panicked"));
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 1);
        assert_eq!(respondent_rows(&pool, respondent.email.as_str()).await, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn responses_round_trip_unchanged() {
        let pool = pool().await;
        let doc = json!({
            "q1": "yes",
            "amount": 1234.5,
            "flags": [true, false, null],
            "nested": {"deep": {"list": [1, "two", {"three": 3}]}},
            "unicode": "₹ naïve"
        });

        let repo = SubmissionRepo::new(&pool);
        let receipt = repo
            .create(submission(fresh_respondent("Doc"), doc.clone()), &SampleInsightGenerator)
            .await
            .unwrap();

        let stored = repo.get(receipt.submission_id).await.unwrap();
        assert_eq!(stored.responses.0, doc);
        assert!(stored.is_complete);
        assert_eq!(stored.form_type, "risk");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insights_are_stored_for_submission() {
        let pool = pool().await;
        let receipt = SubmissionRepo::new(&pool)
            .create(submission(fresh_respondent("Ins"), json!({})), &SampleInsightGenerator)
            .await
            .unwrap();

        let rows: Vec<(String, i32, Uuid)> = sqlx::query_as(
            "SELECT title, priority, respondent_id FROM financial_insights WHERE submission_id = $1",
        )
        .bind(receipt.submission_id)
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "Sample Financial Insight");
        assert_eq!(rows[0].1, 1);
        assert_eq!(rows[0].2, receipt.respondent_id);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failed_insight_insert_rolls_back_everything() {
        let pool = pool().await;
        let respondent = fresh_respondent("Rollback");
        // title exceeds VARCHAR(255)
        let oversized = |_: &str, _: &Value| {
            vec![InsightDraft {
                title: "t".repeat(300),
                content: String::new(),
                category: "Finance".into(),
                priority: 1,
                data: None,
            }]
        };

        let result = SubmissionRepo::new(&pool)
            .create(submission(respondent.clone(), json!({})), &oversized)
            .await;

        assert!(matches!(result, Err(DbError::Sqlx(_))));
        assert_eq!(respondent_rows(&pool, respondent.email.as_str()).await, 0);
    }
}
