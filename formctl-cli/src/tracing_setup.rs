//! Tracing setup for the formctl binary
//!
//! Console output always; OTLP span export when built with the `telemetry`
//! feature and run with `--otel`. `RUST_LOG` overrides the level chosen by
//! `--debug`.
//!
//! Environment variables:
//!   RUST_LOG                          # Log filter (default: info)
//!   OTEL_EXPORTER_OTLP_ENDPOINT       # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                 # Service name (default: formctl)

use anyhow::{anyhow, Result};
use tracing::Span;
use tracing_subscriber::EnvFilter;

/// Name reported to collectors and used as the root span name
pub const SERVICE_NAME: &str = "formctl";

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Default to `debug` instead of `info`
    pub debug: bool,
    /// Export spans over OTLP
    pub otel: bool,
}

fn env_filter(debug: bool) -> EnvFilter {
    let default = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Root span every command runs inside, so exported traces carry the
/// subcommand and build version.
pub fn command_span(command: &'static str) -> Span {
    tracing::info_span!(
        "formctl",
        command,
        version = env!("CARGO_PKG_VERSION")
    )
}

fn init_console(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.debug))
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(feature = "telemetry")]
fn init_with_otlp(config: &TracingConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());
    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![
            KeyValue::new("service.name", service_name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]))
        .build();

    let telemetry = tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME));

    // Dropping the provider stops export
    let _ = opentelemetry::global::set_tracer_provider(provider);

    tracing_subscriber::registry()
        .with(env_filter(config.debug))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(config.debug)
                .compact(),
        )
        .with(telemetry)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(endpoint = %endpoint, service = %service_name, "OTLP export enabled");
    Ok(())
}

/// Flush pending spans before exit.
#[cfg(feature = "telemetry")]
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown() {}

/// Install the global subscriber.
///
/// `--otel` without the `telemetry` feature logs a warning and falls back
/// to console output.
pub fn init(config: &TracingConfig) -> Result<()> {
    #[cfg(feature = "telemetry")]
    if config.otel {
        return init_with_otlp(config);
    }

    init_console(config)?;
    if config.otel {
        tracing::warn!("--otel ignored: formctl was built without the telemetry feature");
    }
    Ok(())
}
