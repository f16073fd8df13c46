//! # catalog-api
//!
//! HTTP adapter for the catalog services.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog API Server                               │
//! │                                                                         │
//! │  Client ───► axum (8080) ───► routes ───► CategoryService ───► SQLite   │
//! │                                  │        ProductService               │
//! │                                  ▼                                      │
//! │                              ApiError ───► 400 / 404 / 500 + JSON body  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is built from an [`AppState`], so tests can drive it with the
//! in-memory store and no listener.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use catalog_db::{Database, DbConfig, DbError};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{ApiConfig, ConfigError};
pub use crate::state::AppState;

/// Failures that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the full router with every catalog route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::category::router())
        .merge(routes::product::router())
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured filter.
pub fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Opens the database, binds the listener and serves until `shutdown`
/// completes.
pub async fn run(
    config: ApiConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let db_config = DbConfig::new(&config.database.path)
        .max_connections(config.database.max_connections)
        .run_migrations(config.database.run_migrations);
    let db_config = if db_config.is_in_memory() {
        // A private in-memory database only lives on a single connection
        db_config.max_connections(1)
    } else {
        db_config
    };

    let database = Database::new(db_config).await?;
    info!(path = %config.database.path.display(), "Database ready");

    let app = build_router(AppState::from_database(database.clone()));

    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr).await.inspect_err(|e| {
        error!(addr = %bind_addr, error = %e, "Failed to bind");
    })?;
    info!(addr = %bind_addr, "Catalog API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    database.close().await;
    info!("Server shutdown complete");
    Ok(())
}
