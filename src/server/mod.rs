// src/server/mod.rs
//! Recipebook HTTP server
//!
//! Exposes the recipe catalog as a JSON REST resource:
//! - `GET/POST /v1/recipes`
//! - `GET/PATCH/PUT/DELETE /v1/recipes/:id`
//!
//! Handlers are stateless; each request opens its own SQLite connection in
//! a blocking task and every write is a single transaction.

pub mod config;
mod handlers;
mod routes;

pub use config::CatalogConfig;
pub use handlers::{ApiError, ApiResult, ProblemDetails};
pub use routes::create_router;

use crate::catalog::MissingIngredients;
use crate::db;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
    /// Path to the recipe database
    pub db_path: PathBuf,
    /// How long a connection waits on a locked database
    pub busy_timeout: Duration,
    /// Full-update handling of a body without `ingredients`
    pub missing_ingredients: MissingIngredients,
    /// CORS allowed origins (empty = any origin)
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: PathBuf::from(db::DEFAULT_DB_PATH),
            busy_timeout: db::DEFAULT_BUSY_TIMEOUT,
            missing_ingredients: MissingIngredients::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Shared server state
pub struct ServerState {
    pub config: ServerConfig,
}

/// Shared server state type
pub type SharedState = Arc<ServerState>;

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Open a database connection
    ///
    /// Call from within `spawn_blocking`; rusqlite is synchronous.
    pub fn open_db(&self) -> crate::Result<Connection> {
        db::open_with_timeout(&self.config.db_path, self.config.busy_timeout)
    }
}

/// Start the server and serve until Ctrl-C
pub async fn run_server(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting recipebook server on {}", config.bind_addr);
    tracing::info!("Database: {:?}", config.db_path);
    tracing::info!(
        "Full update without ingredients: {}",
        config.missing_ingredients.as_str()
    );

    db::init(&config.db_path)
        .with_context(|| format!("Failed to initialize database {}", config.db_path.display()))?;

    let state = Arc::new(ServerState::new(config.clone()));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Recipebook is ready to serve");

    axum::serve(listener, app)
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
