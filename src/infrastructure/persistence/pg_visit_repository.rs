//! PostgreSQL implementation of visit repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_OPERATION_TIMEOUT, with_deadline};
use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct VisitRow {
    id: i64,
    link_id: i64,
    clicked_at: DateTime<Utc>,
    referrer: String,
    user_agent: String,
    ip_address: String,
}

/// PostgreSQL repository for the visit log.
///
/// Each visit is a single-row insert committed before the call returns, so a
/// following count always includes it.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
    operation_timeout: Duration,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_timeout(pool, DEFAULT_OPERATION_TIMEOUT)
    }

    /// Creates a repository with a custom per-statement deadline.
    pub fn with_timeout(pool: Arc<PgPool>, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn log_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let query = sqlx::query_as::<_, VisitRow>(
            r#"
            INSERT INTO visits (link_id, referrer, user_agent, ip_address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, link_id, clicked_at, referrer, user_agent, ip_address
            "#,
        )
        .bind(new_visit.link_id)
        .bind(new_visit.referrer)
        .bind(new_visit.user_agent)
        .bind(new_visit.ip_address)
        .fetch_one(self.pool.as_ref());

        let row = with_deadline(self.operation_timeout, "log_visit", query).await?;

        Ok(Visit::new(
            row.id,
            row.link_id,
            row.clicked_at,
            row.referrer,
            row.user_agent,
            row.ip_address,
        ))
    }

    async fn count_visits(&self, link_id: i64) -> Result<i64, AppError> {
        let query = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visits WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref());

        with_deadline(self.operation_timeout, "count_visits", query).await
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let query =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visits").fetch_one(self.pool.as_ref());

        with_deadline(self.operation_timeout, "count_all_visits", query).await
    }
}
