//! Schema migrations for respondents, submissions, insights, reviews, and dashboard stats
//!
//! Every statement is idempotent, so `run` is safe on each startup.

use sqlx::PgPool;

/// Create all tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running formctl migrations...");

    // Respondents: who submitted a form
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS respondents (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            company_name VARCHAR(255),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Form submissions: answers kept as a single jsonb document
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS form_submissions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            respondent_id UUID NOT NULL REFERENCES respondents(id),
            form_type VARCHAR(50) NOT NULL,
            responses JSONB NOT NULL,
            is_complete BOOLEAN NOT NULL DEFAULT TRUE,
            submission_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Insights generated per submission, priority 1 (highest) to 5 (lowest)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS financial_insights (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            submission_id UUID NOT NULL REFERENCES form_submissions(id),
            respondent_id UUID NOT NULL REFERENCES respondents(id),
            title VARCHAR(255) NOT NULL,
            content VARCHAR(5000) NOT NULL,
            category VARCHAR(100) NOT NULL,
            priority INTEGER NOT NULL,
            data JSONB,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Pre-computed admin statistics; nothing reads or writes it yet
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dashboard_stats (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            stat_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            total_submissions INTEGER NOT NULL,
            submissions_today INTEGER NOT NULL,
            total_insights INTEGER NOT NULL,
            insights_by_category JSONB NOT NULL,
            recent_submissions JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Reviews: rating range is checked in the application, not here
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            respondent_id UUID NOT NULL REFERENCES respondents(id),
            rating INTEGER NOT NULL,
            reaction VARCHAR(50),
            feedback VARCHAR(2000),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("formctl migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Unique: the respondent upsert uses it as its ON CONFLICT arbiter.
    // Fails on a database that already holds duplicate emails.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS respondents_email_key ON respondents(email)",
    )
    .execute(pool)
    .await?;

    // Submission indexes
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS respondent_id_idx ON form_submissions(respondent_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS submission_date_idx ON form_submissions(submission_date)",
    )
    .execute(pool)
    .await?;

    // Insight indexes
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS submission_id_idx ON financial_insights(submission_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS respondent_id_insights_idx ON financial_insights(respondent_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS category_idx ON financial_insights(category)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS priority_idx ON financial_insights(priority)")
        .execute(pool)
        .await?;

    // Dashboard indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS date_idx ON dashboard_stats(stat_date)")
        .execute(pool)
        .await?;

    // Review indexes
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS review_respondent_id_idx ON reviews(respondent_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS rating_idx ON reviews(rating)")
        .execute(pool)
        .await?;

    Ok(())
}
