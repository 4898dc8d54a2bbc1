//! Visit entity representing a single successful resolution.

use chrono::{DateTime, Utc};

/// A visit recorded when a short link is resolved.
///
/// Client metadata is stored verbatim; any of it may be empty. Visits are
/// append-only and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: String,
    pub ip_address: String,
}

impl Visit {
    /// Creates a new Visit instance.
    pub fn new(
        id: i64,
        link_id: i64,
        clicked_at: DateTime<Utc>,
        referrer: String,
        user_agent: String,
        ip_address: String,
    ) -> Self {
        Self {
            id,
            link_id,
            clicked_at,
            referrer,
            user_agent,
            ip_address,
        }
    }
}

/// Opaque client metadata captured by the HTTP layer for each access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorInfo {
    pub referrer: String,
    pub user_agent: String,
    pub ip_address: String,
}

impl VisitorInfo {
    /// Builds visitor info from optional header values, defaulting to empty strings.
    pub fn new(referrer: Option<&str>, user_agent: Option<&str>, ip_address: Option<String>) -> Self {
        Self {
            referrer: referrer.unwrap_or_default().to_string(),
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip_address: ip_address.unwrap_or_default(),
        }
    }
}

/// Input data for recording a new visit.
///
/// `link_id` must reference an existing link; the timestamp is set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub link_id: i64,
    pub referrer: String,
    pub user_agent: String,
    pub ip_address: String,
}

impl NewVisit {
    pub fn new(link_id: i64, visitor: VisitorInfo) -> Self {
        Self {
            link_id,
            referrer: visitor.referrer,
            user_agent: visitor.user_agent,
            ip_address: visitor.ip_address,
        }
    }
}
