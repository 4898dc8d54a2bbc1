//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a link's details and visit count.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`, also mounted as `GET /{code}/stats`
///
/// Viewing statistics is not a visit and is not counted. Expired links are
/// reported with `expired: true`.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.resolution_service.stats(&code).await?;
    let expired = stats.link.is_expired();

    Ok(Json(StatsResponse {
        short_url: state.short_url(&stats.link.code),
        code: stats.link.code,
        target_url: stats.link.target_url,
        created_at: stats.link.created_at,
        expires_at: stats.link.expires_at,
        expired,
        visits: stats.visits,
    }))
}
