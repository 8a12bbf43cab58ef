//! RoadRater backend - HTTP API for crowdsourced road-quality ratings.
//!
//! This is the main entry point for the roadrater service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roadrater_service::{create_router, AppState, ServiceConfig};
use roadrater_store::PgStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roadrater=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RoadRater backend");

    // Load configuration from environment; invalid config exits here.
    let config = ServiceConfig::from_env()?;

    tracing::info!(
        port = %config.port,
        cors_origins = ?config.cors_origins,
        "Service configuration loaded"
    );

    // Connect to PostgreSQL and apply the schema
    let store = PgStore::connect(&config.database_url).await?;
    store.ensure_schema().await?;

    // Build app state
    let state = AppState::new(Arc::new(store), config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    let addr = config.listen_addr();
    tracing::info!(listen_addr = %addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
