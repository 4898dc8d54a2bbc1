//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::debug;

use crate::domain::entities::{Link, VisitorInfo};
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Capture `Referer`, `User-Agent` and the peer IP verbatim
/// 2. Resolve the code; expired links count as missing
/// 3. Build the `Location` header
/// 4. Log the visit
/// 5. Return 303 See Other
///
/// The visit is logged before responding, and only once the redirect can be
/// built. If logging fails no redirect is served.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
/// Returns 500 Internal Server Error on storage failure or if the stored
/// target cannot be sent as a `Location` header.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let visitor = VisitorInfo::new(
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
        headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()),
        Some(addr.ip().to_string()),
    );

    let location = state
        .resolution_service
        .resolve_with(&code, visitor, location_header)
        .await?;
    debug!(code = %code, "Redirecting to {:?}", location);

    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]))
}

/// Header value for a link's target; fails for targets with bytes a header
/// cannot carry, such as control characters.
fn location_header(link: &Link) -> Result<HeaderValue, AppError> {
    HeaderValue::try_from(link.target_url.as_str()).map_err(|_| {
        AppError::storage(
            "Stored target URL is not a valid Location header",
            json!({ "id": link.id, "code": link.code }),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn link(target_url: &str) -> Link {
        Link::new(1, "abc123".to_string(), target_url.to_string(), Utc::now(), None)
    }

    #[test]
    fn test_location_header_accepts_url() {
        let value = location_header(&link("https://example.com/page?q=1")).unwrap();
        assert_eq!(value, "https://example.com/page?q=1");
    }

    #[test]
    fn test_location_header_rejects_control_characters() {
        let result = location_header(&link("https://example.com/a\nb"));
        assert!(matches!(result.unwrap_err(), AppError::Storage { .. }));
    }
}
