//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//! Every statement runs under a deadline; an elapsed deadline is reported as
//! [`AppError::Storage`], never silently dropped.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and lookup
//! - [`PgVisitRepository`] - Visit logging and counting

pub mod pg_link_repository;
pub mod pg_visit_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_visit_repository::PgVisitRepository;

use crate::error::AppError;
use serde_json::json;
use std::future::Future;
use std::time::Duration;

/// Deadline applied to each statement when none is configured.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs a database future under a deadline.
async fn with_deadline<T, F>(timeout: Duration, operation: &'static str, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::storage(
            "Storage operation timed out",
            json!({
                "operation": operation,
                "timeout_ms": u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        )),
    }
}
