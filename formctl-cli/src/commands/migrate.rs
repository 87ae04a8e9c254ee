//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use formctl_server::db::migrations;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Create tables and indexes, then exit. Safe to run repeatedly.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.db.connect().await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations complete");
    pool.close().await;
    Ok(())
}
