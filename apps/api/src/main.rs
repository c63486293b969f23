//! # Pangkas POS API
//!
//! REST server for the barbershop back office.
//!
//! ## Architecture
//! ```text
//! Admin SPA ──► axum (:3001) ──► handlers ──► pangkas-db ──► MySQL
//!                   │
//!                   └──► uploads/ (proof images, served at /uploads)
//! ```

mod auth;
mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod state;
mod upload;

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::state::AppState;
use pangkas_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting Pangkas POS API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        db_url = %config.database_url.chars().take(30).collect::<String>(),
        "Configuration loaded"
    );

    // Connect to database and run migrations
    let db = Database::connect(DbConfig::new(&config.database_url)).await?;
    info!("Connected to MySQL");

    // Upload directory must exist before ServeDir points at it
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);

    let state = AppState {
        db,
        jwt,
        config: config.clone(),
    };

    let app = routes::build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
