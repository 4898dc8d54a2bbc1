//! Repository trait for visit analytics.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only visit log with on-demand aggregation.
///
/// A count taken after [`VisitRepository::log_visit`] has returned must include
/// that visit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Appends one visit stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors, including a
    /// `link_id` that references no link.
    async fn log_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError>;

    /// Returns the number of visits recorded for a link, `0` if none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn count_visits(&self, link_id: i64) -> Result<i64, AppError>;

    /// Returns the number of visits across all links.
    async fn count_all(&self) -> Result<i64, AppError>;
}
