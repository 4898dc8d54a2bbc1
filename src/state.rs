//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ResolutionService;
use crate::domain::repositories::{LinkRepository, VisitRepository};

/// Resolution service over type-erased repositories, so the storage backend
/// can be chosen at startup.
pub type DynResolutionService = ResolutionService<dyn LinkRepository, dyn VisitRepository>;

#[derive(Clone)]
pub struct AppState {
    pub resolution_service: Arc<DynResolutionService>,
    pub base_url: Arc<str>,
    pub default_ttl_days: i32,
}

impl AppState {
    pub fn new(
        resolution_service: Arc<DynResolutionService>,
        base_url: &str,
        default_ttl_days: i32,
    ) -> Self {
        Self {
            resolution_service,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            default_ttl_days,
        }
    }

    /// Full public URL for a short code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
