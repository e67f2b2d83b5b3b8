//! # Quadrant API Server
//!
//! Read-only HTTP API over a task collection organized by the Eisenhower
//! decision matrix: list, quadrant and status filters, substring search,
//! single-task lookup, and aggregate statistics.
//!
//! With `DATABASE_URL` set the server reads from PostgreSQL; without it the
//! server runs against a seeded in-memory demo collection.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p quadrant-api
//! ```

use quadrant_api::{
    app::{build_router, AppState},
    config::Config,
};
use quadrant_shared::db::pool::{create_pool, DatabaseConfig};
use quadrant_shared::repo::{MemoryTaskRepository, PgTaskRepository, TaskRepository};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quadrant_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Quadrant API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let repo: Arc<dyn TaskRepository> = match &config.database {
        Some(db) => {
            let pool = create_pool(DatabaseConfig {
                url: db.url.clone(),
                max_connections: db.max_connections,
                ..Default::default()
            })
            .await?;
            Arc::new(PgTaskRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving the seeded in-memory demo collection");
            Arc::new(MemoryTaskRepository::seeded())
        }
    };

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(repo, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
