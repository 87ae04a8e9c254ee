//! formctl - form submission, insight, and review service
//!
//! Entry point for the `formctl` binary:
//! - `serve` runs the HTTP API
//! - `migrate` creates the schema and exits

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Instrument;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "formctl",
    author,
    version,
    about = "Form submissions, financial insights, and reviews over HTTP"
)]
struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export spans over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create tables and indexes, then exit
    Migrate(commands::migrate::MigrateArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Serve(_) => "serve",
            Self::Migrate(_) => "migrate",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let span = tracing_setup::command_span(cli.command.name());
    let result = async {
        match cli.command {
            Commands::Serve(args) => commands::run_serve(args).await,
            Commands::Migrate(args) => commands::run_migrate(args).await,
        }
    }
    .instrument(span)
    .await;

    tracing_setup::shutdown();
    result
}
