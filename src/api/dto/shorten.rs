//! DTOs for link shortening endpoint.

use crate::error::ErrorInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum number of URLs accepted in one request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Request to shorten one or more URLs.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(nested)]
    pub urls: Vec<UrlItem>,
}

/// Individual URL to be shortened.
///
/// Scheme and blank checks happen in the service so that each item reports
/// its own `invalid_url` error.
#[derive(Debug, Deserialize, Validate)]
pub struct UrlItem {
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,

    /// Days until the link expires. `0` or negative: never. Omitted: server default.
    #[validate(range(max = 36500, message = "ttl_days must be at most 36500"))]
    pub ttl_days: Option<i32>,
}

/// Response containing batch processing results.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Individual result for a URL in the batch.
///
/// Uses untagged enum for cleaner JSON structure (no discriminator field).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResultItem {
    Success {
        target_url: String,
        code: String,
        short_url: String,
        expires_at: Option<DateTime<Utc>>,
    },
    Error {
        target_url: String,
        error: ErrorInfo,
    },
}

/// Summary statistics for batch processing.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
