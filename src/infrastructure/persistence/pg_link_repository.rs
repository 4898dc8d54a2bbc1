//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::{DEFAULT_OPERATION_TIMEOUT, with_deadline};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    target_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.code, r.target_url, r.created_at, r.expires_at)
    }
}

/// PostgreSQL repository for link storage and lookup.
///
/// Code uniqueness is enforced by the `links_code_key` constraint, so
/// concurrent inserts of the same code resolve inside the database.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    operation_timeout: Duration,
}

impl PgLinkRepository {
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
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let code = new_link.code.clone();

        let query = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, target_url, expires_at)
            VALUES (
                $1,
                $2,
                CASE WHEN $3::int > 0 THEN NOW() + make_interval(days => $3::int) END
            )
            RETURNING id, code, target_url, created_at, expires_at
            "#,
        )
        .bind(new_link.code)
        .bind(new_link.target_url)
        .bind(new_link.ttl_days)
        .fetch_one(self.pool.as_ref());

        let row = with_deadline(self.operation_timeout, "create_link", query)
            .await
            .map_err(|e| match e {
                AppError::DuplicateCode { .. } => AppError::duplicate_code(code),
                other => other,
            })?;

        Ok(row.into())
    }

    async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let query = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, target_url, created_at, expires_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref());

        with_deadline(self.operation_timeout, "resolve_link", query)
            .await?
            .map(Link::from)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    async fn get_by_id(&self, id: i64) -> Result<Link, AppError> {
        let query = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, target_url, created_at, expires_at
            FROM links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref());

        with_deadline(self.operation_timeout, "get_link", query)
            .await?
            .map(Link::from)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let query = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref());

        with_deadline(self.operation_timeout, "count_links", query).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        let query = sqlx::query("SELECT 1").execute(self.pool.as_ref());

        with_deadline(self.operation_timeout, "ping", query).await?;
        Ok(())
    }
}
