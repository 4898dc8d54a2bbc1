//! Short link creation, resolution and statistics.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::entities::{Link, NewLink, NewVisit, VisitorInfo};
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_check::check_target_url;

/// Retry cap used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// A link together with its aggregated visit count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub link: Link,
    pub visits: i64,
}

/// Orchestrates code generation, link storage and visit logging.
///
/// The service owns the generate-and-insert retry loop and the expiration
/// policy. It never logs; every failure is returned as an [`AppError`].
///
/// Repositories may be concrete types or trait objects
/// (`ResolutionService<dyn LinkRepository, dyn VisitRepository>`).
pub struct ResolutionService<L, V>
where
    L: LinkRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    link_repository: Arc<L>,
    visit_repository: Arc<V>,
    code_generator: CodeGenerator,
    max_attempts: usize,
}

impl<L, V> ResolutionService<L, V>
where
    L: LinkRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    /// Creates a new resolution service.
    ///
    /// `max_attempts` bounds the number of candidate codes tried per link and
    /// is raised to at least one.
    pub fn new(
        link_repository: Arc<L>,
        visit_repository: Arc<V>,
        code_generator: CodeGenerator,
        max_attempts: usize,
    ) -> Self {
        Self {
            link_repository,
            visit_repository,
            code_generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Length of generated codes.
    pub fn code_length(&self) -> usize {
        self.code_generator.length()
    }

    /// Creates a short link for `target_url`.
    ///
    /// `ttl_days <= 0` creates a link that never expires.
    ///
    /// # Collisions
    ///
    /// A candidate rejected by the store with [`AppError::DuplicateCode`] is
    /// replaced by a fresh one, up to the configured attempt cap. Duplicate
    /// codes never reach the caller.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL is blank or not http(s)
    /// - [`AppError::GenerationExhausted`] if every attempt collided
    /// - [`AppError::Storage`] on storage failure, without retrying
    pub async fn shorten(&self, target_url: &str, ttl_days: i32) -> Result<Link, AppError> {
        check_target_url(target_url).map_err(|e| {
            AppError::invalid_url(e.to_string(), json!({ "url": target_url }))
        })?;

        for _ in 0..self.max_attempts {
            let new_link = NewLink {
                code: self.code_generator.generate(),
                target_url: target_url.to_string(),
                ttl_days,
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::DuplicateCode { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Resolves a code to its target URL and records the visit.
    ///
    /// The visit is written before the URL is returned; if it cannot be
    /// logged the resolution fails and no redirect should be served.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is unknown or the link has expired
    /// - [`AppError::Storage`] if the lookup or the visit log fails
    pub async fn resolve(&self, code: &str, visitor: VisitorInfo) -> Result<String, AppError> {
        self.resolve_with(code, visitor, |link| Ok(link.target_url.clone()))
            .await
    }

    /// Like [`Self::resolve`], but lets the caller turn the live link into
    /// its response before the visit is recorded.
    ///
    /// A visit is only logged once `prepare` succeeds, so a link the caller
    /// cannot serve is never counted.
    ///
    /// # Errors
    ///
    /// As [`Self::resolve`], plus any error returned by `prepare`.
    pub async fn resolve_with<T, F>(
        &self,
        code: &str,
        visitor: VisitorInfo,
        prepare: F,
    ) -> Result<T, AppError>
    where
        T: Send,
        F: FnOnce(&Link) -> Result<T, AppError> + Send,
    {
        let link = self.link_repository.resolve(code).await?;

        if link.is_expired_at(Utc::now()) {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        let prepared = prepare(&link)?;

        self.visit_repository
            .log_visit(NewVisit::new(link.id, visitor))
            .await?;

        Ok(prepared)
    }

    /// Returns a link and its visit count without recording a visit.
    ///
    /// Expired links still report their statistics.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is unknown
    /// - [`AppError::Storage`] on storage failure
    pub async fn stats(&self, code: &str) -> Result<LinkStats, AppError> {
        let link = self.link_repository.resolve(code).await?;
        self.aggregate(link).await
    }

    /// Same as [`Self::stats`], looking the link up by id.
    pub async fn stats_by_id(&self, id: i64) -> Result<LinkStats, AppError> {
        let link = self.link_repository.get_by_id(id).await?;
        self.aggregate(link).await
    }

    /// Total numbers of stored links and logged visits.
    pub async fn totals(&self) -> Result<(i64, i64), AppError> {
        let links = self.link_repository.count().await?;
        let visits = self.visit_repository.count_all().await?;
        Ok((links, visits))
    }

    /// Checks that the link store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    async fn aggregate(&self, link: Link) -> Result<LinkStats, AppError> {
        let visits = self.visit_repository.count_visits(link.id).await?;
        Ok(LinkStats { link, visits })
    }
}
