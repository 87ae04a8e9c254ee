//! HTTP server command
//!
//! Connects to Postgres, brings the schema up to date, and serves the form
//! API until Ctrl+C or SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use formctl_server::db::migrations;
use formctl_server::http::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Interface to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Seconds a request may run before it is answered with 408
    #[arg(long, env = "FORMCTL_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Maximum request body size in MiB
    #[arg(long, env = "FORMCTL_BODY_LIMIT_MB", default_value_t = 25)]
    pub body_limit_mb: usize,

    /// Only allow browser origins on localhost instead of any origin
    #[arg(long)]
    pub localhost_cors: bool,

    /// Skip creating tables and indexes on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: !self.localhost_cors,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            body_limit: self.body_limit_mb.saturating_mul(1024 * 1024),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();
    tracing::info!("Starting formctl server on {}", config.bind_addr);

    let pool = args.db.connect().await?;

    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations complete");
    }

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
