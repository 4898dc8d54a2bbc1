//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`             - Short link redirect
//! - `GET  /{code}/stats`       - Alias of `/api/stats/{code}`
//! - `GET  /health`             - Storage health check
//! - `POST /api/shorten`        - Create short links
//! - `GET  /api/stats/{code}`   - Visit statistics for a link
//!
//! Every request is traced; trailing slashes are trimmed by the server
//! (see [`crate::server`]).

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, stats_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/{code}/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}
