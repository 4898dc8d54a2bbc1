//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable, unique mapping from short code to [`Link`].
///
/// Uniqueness of `code` must be enforced by the store itself as an atomic
/// insert-if-absent, never by a lookup before the insert: two concurrent
/// creations with the same candidate must see exactly one success.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - single-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// Expiry is derived from `new_link.ttl_days` relative to the store's
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the code is already taken, whether
    /// or not the earlier link has expired.
    ///
    /// Returns [`AppError::Storage`] on database errors or timeouts. A timed-out
    /// create is ambiguous: the row may or may not exist.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Looks a link up by code. Expired links are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has that code.
    /// Returns [`AppError::Storage`] on database errors.
    async fn resolve(&self, code: &str) -> Result<Link, AppError>;

    /// Looks a link up by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if absent.
    /// Returns [`AppError::Storage`] on database errors.
    async fn get_by_id(&self, id: i64) -> Result<Link, AppError>;

    /// Counts all stored links, expired ones included.
    async fn count(&self) -> Result<i64, AppError>;

    /// Verifies that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
