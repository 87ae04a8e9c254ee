//! Respondent repository
//!
//! Respondents are created implicitly by form submissions and looked up by
//! id when reviews reference them.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::models::NewRespondent;
use super::DbError;

/// Respondent record from database
#[derive(Debug, Clone, FromRow)]
pub struct Respondent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Respondent repository
pub struct RespondentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RespondentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find or create the respondent for an email, inside the caller's transaction.
    ///
    /// Uses the unique email index as the ON CONFLICT arbiter, so two
    /// concurrent first submissions from one email converge on one row.
    /// An existing respondent keeps its original name and company.
    pub(crate) async fn upsert_by_email(
        conn: &mut PgConnection,
        respondent: &NewRespondent,
    ) -> Result<Respondent, DbError> {
        let row: Respondent = sqlx::query_as(
            r#"
            INSERT INTO respondents (name, email, company_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, name, email, company_name, created_at, updated_at
            "#,
        )
        .bind(&respondent.name)
        .bind(respondent.email.as_str())
        .bind(respondent.company_name.as_deref())
        .fetch_one(conn)
        .await?;

        Ok(row)
    }

    /// Resolve a client-supplied respondent id.
    ///
    /// Anything that is not the id of an existing respondent, including a
    /// string that isn't a UUID at all, is reported as not found.
    pub async fn resolve(&self, raw_id: &str) -> Result<Uuid, DbError> {
        let not_found = || DbError::NotFound {
            resource: "respondent",
            id: raw_id.to_owned(),
        };

        let id = Uuid::parse_str(raw_id.trim()).map_err(|_| not_found())?;

        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM respondents WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        if !exists {
            return Err(not_found());
        }

        Ok(id)
    }

    /// Get a respondent by email.
    #[cfg(test)]
    pub(crate) async fn find_by_email(
        &self,
        email: &crate::models::Email,
    ) -> Result<Option<Respondent>, DbError> {
        let row = sqlx::query_as(
            r#"
            SELECT id, name, email, company_name, created_at, updated_at
            FROM respondents
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support::{fresh_respondent, pool};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn upsert_returns_existing_row() {
        let pool = pool().await;
        let first = fresh_respondent("Ada");
        let mut renamed = first.clone();
        renamed.name = "Someone Else".into();

        let mut conn = pool.acquire().await.unwrap();
        let a = RespondentRepo::upsert_by_email(&mut conn, &first).await.unwrap();
        let b = RespondentRepo::upsert_by_email(&mut conn, &renamed).await.unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(b.name, "Ada");
        assert_eq!(b.company_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn resolve_rejects_unknown_and_malformed_ids() {
        let pool = pool().await;
        let repo = RespondentRepo::new(&pool);

        let err = repo.resolve("<missing>").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "respondent", .. }));

        let err = repo.resolve(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn resolve_finds_existing_respondent() {
        let pool = pool().await;
        let respondent = fresh_respondent("Grace");
        let mut conn = pool.acquire().await.unwrap();
        let row = RespondentRepo::upsert_by_email(&mut conn, &respondent).await.unwrap();
        drop(conn);

        let repo = RespondentRepo::new(&pool);
        assert_eq!(repo.resolve(&row.id.to_string()).await.unwrap(), row.id);

        let found = repo.find_by_email(&respondent.email).await.unwrap().unwrap();
        assert_eq!(found.id, row.id);
    }
}
