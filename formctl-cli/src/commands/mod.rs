//! Command implementations for the formctl CLI

pub mod migrate;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use formctl_server::db::{create_pool_with_options, PgPool, DEFAULT_MAX_CONNECTIONS};

pub use migrate::run_migrate;
pub use serve::run_serve;

/// Database connection flags shared by every command
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum connections in the pool
    #[arg(long, env = "FORMCTL_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DatabaseArgs {
    pub async fn connect(&self) -> Result<PgPool> {
        create_pool_with_options(&self.database_url, self.max_connections)
            .await
            .context("Failed to create database pool")
    }
}
