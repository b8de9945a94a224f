//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use intake_core::Config;
use intake_processing::{FileValidator, Ingestor};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = build_state(config.clone()).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Build shared state: storage root, validator and ingestor.
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    let storage = storage::setup_storage(&config).await?;
    let ingestor = Ingestor::new(FileValidator::from_config(&config), storage);

    Ok(Arc::new(AppState::new(config, ingestor)))
}
