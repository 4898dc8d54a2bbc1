//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A link with its aggregated visit count.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// True once the link stopped resolving.
    pub expired: bool,
    pub visits: i64,
}
