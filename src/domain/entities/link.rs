//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// Longest accepted time-to-live, in days (about 100 years).
pub const MAX_TTL_DAYS: i32 = 36_500;

/// A shortened URL link with its expiry.
///
/// Links are created once and never mutated. An expired link stays in storage
/// and keeps its code; it only stops resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        target_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            code,
            target_url,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the link's expiry lies before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for creating a new link.
///
/// The store sets `created_at` and derives `expires_at` from `ttl_days`
/// using its own clock: `ttl_days <= 0` means the link never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub ttl_days: i32,
}

impl NewLink {
    /// Returns whether this link should carry an expiry.
    pub fn expires(&self) -> bool {
        self.ttl_days > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
            None,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.code, "abc123");
        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.created_at, now);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_link_is_expired() {
        let link = Link::new(
            1,
            "code12".to_string(),
            "https://example.com".to_string(),
            Utc::now(),
            Some(Utc::now() - Duration::seconds(1)),
        );
        assert!(link.is_expired());
    }

    #[test]
    fn test_link_not_yet_expired() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "code12".to_string(),
            "https://example.com".to_string(),
            now,
            Some(now + Duration::days(7)),
        );

        assert!(!link.is_expired_at(now));
        assert!(link.is_expired_at(now + Duration::days(8)));
    }

    #[test]
    fn test_new_link_expires() {
        let mut new_link = NewLink {
            code: "xyz789".to_string(),
            target_url: "https://rust-lang.org".to_string(),
            ttl_days: 7,
        };
        assert!(new_link.expires());

        new_link.ttl_days = 0;
        assert!(!new_link.expires());

        new_link.ttl_days = -3;
        assert!(!new_link.expires());
    }
}
