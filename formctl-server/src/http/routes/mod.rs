//! Route handlers organized by resource

pub mod health;
pub mod insights;
pub mod reviews;
pub mod submissions;

use std::sync::Arc;

use axum::Router;

use super::server::AppState;

/// Everything served under `/form`
pub fn form_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(submissions::router())
        .merge(insights::router())
        .merge(reviews::router())
}
