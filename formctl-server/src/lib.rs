//! formctl-server: form submissions, financial insights, and reviews over HTTP
//!
//! Respondents submit questionnaires, each submission produces insights,
//! and respondents rate the experience. Everything lives in Postgres.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, create_pool_with_options, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
