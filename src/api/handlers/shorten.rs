//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{
    BatchSummary, MAX_BATCH_SIZE, ShortenRequest, ShortenResponse, ShortenResultItem,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates short links for one or more URLs.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     { "url": "https://example.com/page", "ttl_days": 7 }
///   ]
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 1, "successful": 1, "failed": 0 },
///   "items": [
///     {
///       "target_url": "https://example.com/page",
///       "code": "aZ3k9Q",
///       "short_url": "http://localhost:4000/aZ3k9Q",
///       "expires_at": "2026-10-25T12:00:00Z"
///     }
///   ]
/// }
/// ```
///
/// Items are processed independently; a failed item carries its error and
/// does not affect the others.
///
/// # Errors
///
/// Returns 400 Bad Request if the body fails validation or the batch is empty
/// or larger than [`MAX_BATCH_SIZE`].
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let total = payload.urls.len();
    if total == 0 || total > MAX_BATCH_SIZE {
        return Err(AppError::bad_request(
            format!("Between 1 and {MAX_BATCH_SIZE} URLs must be provided"),
            json!({ "provided": total }),
        ));
    }

    let mut items = Vec::with_capacity(total);
    let mut successful = 0;
    let mut failed = 0;

    for item in payload.urls {
        let ttl_days = item.ttl_days.unwrap_or(state.default_ttl_days);

        match state.resolution_service.shorten(&item.url, ttl_days).await {
            Ok(link) => {
                successful += 1;
                tracing::info!(code = %link.code, ttl_days, "Short link created");
                items.push(ShortenResultItem::Success {
                    short_url: state.short_url(&link.code),
                    target_url: link.target_url,
                    code: link.code,
                    expires_at: link.expires_at,
                });
            }
            Err(err) => {
                failed += 1;
                if err.status_code().is_server_error() {
                    tracing::error!(error = %err, "Failed to create short link");
                }
                items.push(ShortenResultItem::Error {
                    target_url: item.url,
                    error: err.to_error_info(),
                });
            }
        }
    }

    Ok(Json(ShortenResponse {
        summary: BatchSummary {
            total,
            successful,
            failed,
        },
        items,
    }))
}
