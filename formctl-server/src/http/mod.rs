//! HTTP layer
//!
//! Axum server with:
//! - Envelope-shaped responses (`{status, statusCode, data, message}`)
//! - Request tracing and timeouts
//! - Graceful shutdown

pub mod envelope;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use envelope::Envelope;
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
