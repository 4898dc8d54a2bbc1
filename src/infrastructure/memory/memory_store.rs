//! Mutex-guarded implementation of both repository traits.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{Link, NewLink, NewVisit, Visit};
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    /// Links ordered by id; `links[i].id == i + 1`.
    links: Vec<Link>,
    ids_by_code: HashMap<String, i64>,
    visits: Vec<Visit>,
}

impl Tables {
    fn link(&self, id: i64) -> Option<&Link> {
        usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.links.get(i))
    }
}

/// In-memory link and visit store.
///
/// Code uniqueness is checked and the link inserted under the same lock, so
/// concurrent creations with one candidate code see exactly one success.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::storage("In-memory store is poisoned", json!({})))
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let now = Utc::now();
        let expires_at = if new_link.expires() {
            let expiry = TimeDelta::try_days(i64::from(new_link.ttl_days))
                .and_then(|ttl| now.checked_add_signed(ttl))
                .ok_or_else(|| {
                    AppError::storage(
                        "Expiry is out of range",
                        json!({ "ttl_days": new_link.ttl_days }),
                    )
                })?;
            Some(expiry)
        } else {
            None
        };

        let mut tables = self.tables()?;

        if tables.ids_by_code.contains_key(&new_link.code) {
            return Err(AppError::duplicate_code(new_link.code));
        }

        let id = i64::try_from(tables.links.len()).unwrap_or(i64::MAX - 1) + 1;
        let link = Link::new(id, new_link.code, new_link.target_url, now, expires_at);

        tables.ids_by_code.insert(link.code.clone(), id);
        tables.links.push(link.clone());

        Ok(link)
    }

    async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        let tables = self.tables()?;

        tables
            .ids_by_code
            .get(code)
            .and_then(|id| tables.link(*id))
            .cloned()
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    async fn get_by_id(&self, id: i64) -> Result<Link, AppError> {
        self.tables()?
            .link(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let tables = self.tables()?;
        Ok(tables.links.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.tables().map(|_| ())
    }
}

#[async_trait]
impl VisitRepository for MemoryStore {
    async fn log_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let mut tables = self.tables()?;

        if tables.link(new_visit.link_id).is_none() {
            return Err(AppError::storage(
                "Foreign key constraint violation",
                json!({ "link_id": new_visit.link_id }),
            ));
        }

        let visit = Visit::new(
            tables.visits.len() as i64 + 1,
            new_visit.link_id,
            Utc::now(),
            new_visit.referrer,
            new_visit.user_agent,
            new_visit.ip_address,
        );
        tables.visits.push(visit.clone());

        Ok(visit)
    }

    async fn count_visits(&self, link_id: i64) -> Result<i64, AppError> {
        let tables = self.tables()?;
        Ok(tables.visits.iter().filter(|v| v.link_id == link_id).count() as i64)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let tables = self.tables()?;
        Ok(tables.visits.len() as i64)
    }
}
