//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, service wiring and the Axum server lifecycle.

use crate::application::services::ResolutionService;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{PgLinkRepository, PgVisitRepository};
use crate::routes::app_router;
use crate::state::{AppState, DynResolutionService};
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Opens the PostgreSQL pool configured by `config` and applies migrations.
///
/// # Errors
///
/// Returns an error if no database URL is configured, the connection fails or
/// a migration cannot be applied.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Builds the resolution service over the configured storage backend.
///
/// # Errors
///
/// Returns an error if storage cannot be reached or the system randomness
/// source is unavailable.
pub async fn build_service(config: &Config) -> Result<DynResolutionService> {
    let (links, visits) = match config.storage {
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(config).await?);
            let links: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::with_timeout(
                pool.clone(),
                config.operation_timeout(),
            ));
            let visits: Arc<dyn VisitRepository> = Arc::new(PgVisitRepository::with_timeout(
                pool,
                config.operation_timeout(),
            ));
            (links, visits)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let links: Arc<dyn LinkRepository> = store.clone();
            let visits: Arc<dyn VisitRepository> = store;
            (links, visits)
        }
    };

    let code_generator = CodeGenerator::from_os_rng(config.code_length)?;

    Ok(ResolutionService::new(
        links,
        visits,
        code_generator,
        config.max_generation_attempts,
    ))
}

/// Runs the HTTP server with the given configuration until Ctrl+C.
///
/// # Errors
///
/// Returns an error if:
/// - Storage setup fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let service = build_service(&config).await?;
    let state = AppState::new(
        Arc::new(service),
        &config.base_url,
        config.default_ttl_days,
    );

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
