//! Storage setup and initialization

use anyhow::{Context, Result};
use intake_core::Config;
use intake_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create the storage root (if missing) and return the storage handle.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(upload_dir = %config.upload_dir.display(), "Initializing local storage...");

    let storage = LocalStorage::new(&config.upload_dir)
        .await
        .context("Failed to initialize local storage")?;
    storage
        .health_check()
        .await
        .context("Storage root is not usable")?;

    tracing::info!(
        upload_dir = %storage.base_path().display(),
        "Local storage initialized successfully"
    );

    Ok(Arc::new(storage))
}
