//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use intake_core::Config;

/// Validate critical configuration values
///
/// Fails fast on settings that would make the service unsafe or unable to
/// accept any upload; warns on settings that are merely unusual.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();

    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if is_production && config.cors_origins.iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.upload_dir.is_file() {
        return Err(anyhow::anyhow!(
            "UPLOAD_DIR {} exists and is not a directory",
            config.upload_dir.display()
        ));
    }

    if config.max_batch_files > 100 {
        tracing::warn!(
            max_batch_files = config.max_batch_files,
            "MAX_BATCH_FILES is very high - a single request may buffer a lot of data"
        );
    }

    Ok(())
}
