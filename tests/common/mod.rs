#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use chrono::Duration;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use shortify::application::services::ResolutionService;
use shortify::domain::entities::{Link, NewLink, NewVisit, Visit};
use shortify::domain::repositories::{LinkRepository, VisitRepository};
use shortify::error::AppError;
use shortify::infrastructure::memory::MemoryStore;
use shortify::state::{AppState, DynResolutionService};
use shortify::utils::code_generator::CodeGenerator;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";
pub const DEFAULT_TTL_DAYS: i32 = 7;

/// Randomness source that always yields zero bits, so every generated code
/// is identical.
pub struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

/// Randomness source that yields zero for its first `zero_draws` draws and
/// seeded output afterwards. Generators built on it with the same
/// `zero_draws` share their first candidate and then diverge.
pub struct ScriptedRng {
    zero_draws: usize,
    rest: StdRng,
}

impl ScriptedRng {
    pub fn new(zero_draws: usize, seed: u64) -> Self {
        Self {
            zero_draws,
            rest: StdRng::seed_from_u64(seed),
        }
    }

    fn take_zero(&mut self) -> bool {
        if self.zero_draws > 0 {
            self.zero_draws -= 1;
            true
        } else {
            false
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if self.take_zero() { 0 } else { self.rest.next_u32() }
    }

    fn next_u64(&mut self) -> u64 {
        if self.take_zero() { 0 } else { self.rest.next_u64() }
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        if self.take_zero() {
            dst.fill(0);
        } else {
            self.rest.fill_bytes(dst);
        }
    }
}

pub fn create_service(
    code_generator: CodeGenerator,
    max_attempts: usize,
) -> Arc<DynResolutionService> {
    create_service_on(Arc::new(MemoryStore::new()), code_generator, max_attempts)
}

/// Builds a service over an existing store, so several services can share it.
pub fn create_service_on(
    store: Arc<MemoryStore>,
    code_generator: CodeGenerator,
    max_attempts: usize,
) -> Arc<DynResolutionService> {
    let links: Arc<dyn LinkRepository> = store.clone();
    let visits: Arc<dyn VisitRepository> = store;

    Arc::new(ResolutionService::new(
        links,
        visits,
        code_generator,
        max_attempts,
    ))
}

pub fn create_seeded_service(seed: u64) -> Arc<DynResolutionService> {
    create_service(CodeGenerator::new(6, StdRng::seed_from_u64(seed)), 10)
}

pub fn create_test_state() -> AppState {
    AppState::new(create_seeded_service(7), BASE_URL, DEFAULT_TTL_DAYS)
}

/// Memory store whose expiring links all expired 30 days ago.
#[derive(Default)]
pub struct BackdatedStore {
    inner: MemoryStore,
}

fn backdate(mut link: Link) -> Link {
    link.expires_at = link.expires_at.map(|t| t - Duration::days(30));
    link
}

#[async_trait]
impl LinkRepository for BackdatedStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.inner.create(new_link).await.map(backdate)
    }

    async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        self.inner.resolve(code).await.map(backdate)
    }

    async fn get_by_id(&self, id: i64) -> Result<Link, AppError> {
        self.inner.get_by_id(id).await.map(backdate)
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.inner.count().await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }
}

#[async_trait]
impl VisitRepository for BackdatedStore {
    async fn log_visit(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        self.inner.log_visit(new_visit).await
    }

    async fn count_visits(&self, link_id: i64) -> Result<i64, AppError> {
        self.inner.count_visits(link_id).await
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        self.inner.count_all().await
    }
}

/// Store that is unreachable for every operation.
pub struct DownStore;

fn unreachable_storage() -> AppError {
    AppError::storage("connection refused", serde_json::json!({}))
}

#[async_trait]
impl LinkRepository for DownStore {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(unreachable_storage())
    }

    async fn resolve(&self, _code: &str) -> Result<Link, AppError> {
        Err(unreachable_storage())
    }

    async fn get_by_id(&self, _id: i64) -> Result<Link, AppError> {
        Err(unreachable_storage())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(unreachable_storage())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unreachable_storage())
    }
}

#[async_trait]
impl VisitRepository for DownStore {
    async fn log_visit(&self, _new_visit: NewVisit) -> Result<Visit, AppError> {
        Err(unreachable_storage())
    }

    async fn count_visits(&self, _link_id: i64) -> Result<i64, AppError> {
        Err(unreachable_storage())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Err(unreachable_storage())
    }
}

/// Builds a state over the given repositories.
pub fn create_state_with<S>(store: Arc<S>) -> AppState
where
    S: LinkRepository + VisitRepository + 'static,
{
    let links: Arc<dyn LinkRepository> = store.clone();
    let visits: Arc<dyn VisitRepository> = store;
    let service = ResolutionService::new(
        links,
        visits,
        CodeGenerator::new(6, StdRng::seed_from_u64(11)),
        10,
    );

    AppState::new(Arc::new(service), BASE_URL, DEFAULT_TTL_DAYS)
}

/// Inserts a fixed peer address, standing in for
/// `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
