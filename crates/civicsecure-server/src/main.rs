//! # civicsecure-server
//!
//! REST API for the CivicSecure grievance portal.
//!
//! This binary provides:
//! - **Complaint CRUD** under `/api/complaints` with pagination and filters
//! - **Aggregate statistics** at `/api/complaints/stats/summary`
//! - **Health check** at `/api/health`
//!
//! Complaints are persisted in SQLite through `civicsecure-store`.

mod api;
mod config;
mod error;

use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;

use civicsecure_shared::constants::APP_NAME;
use civicsecure_store::Database;

use crate::api::{AppState, SharedRepository};
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,civicsecure_server=debug")),
        )
        .init();

    info!("Starting {} API server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");
    info!(environment = %config.environment, "Environment");

    // -----------------------------------------------------------------------
    // 3. Open the complaint store (runs migrations)
    // -----------------------------------------------------------------------
    let db = match Database::open_at(&config.database_path) {
        Ok(db) => {
            info!(path = %config.database_path.display(), "Database connected successfully");
            db
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %config.database_path.display(),
                "Database connection failed"
            );
            return Err(e.into());
        }
    };
    let repo: SharedRepository = Arc::new(Mutex::new(db));

    let http_addr = config.http_addr;
    let app_state = AppState {
        repo,
        config: Arc::new(config),
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
