//! Configuration module
//!
//! Settings are read from the environment (and an optional `.env` file) once at
//! startup. Every knob the upload pipeline depends on is a named option here so
//! nothing is hard-coded in handlers.

use std::env;
use std::path::PathBuf;

const SERVER_PORT: u16 = 8000;
const MAX_FILE_SIZE_MB: usize = 25;
const MAX_BATCH_FILES: usize = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const UPLOAD_DIR: &str = "uploads";
const ALLOWED_EXTENSIONS: &str = "pdf,doc,docx,txt,csv,xls,xlsx,ppt,pptx,png,jpg,jpeg,gif";
const ALLOWED_CONTENT_TYPES: &str = "application/pdf,\
application/msword,\
application/vnd.openxmlformats-officedocument.wordprocessingml.document,\
text/plain,\
text/csv,\
application/vnd.ms-excel,\
application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,\
application/vnd.ms-powerpoint,\
application/vnd.openxmlformats-officedocument.presentationml.presentation,\
image/png,\
image/jpeg,\
image/gif";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    /// Directory where accepted files are persisted
    pub upload_dir: PathBuf,
    pub max_file_size_bytes: usize,
    /// Maximum number of files accepted by one multi-file upload
    pub max_batch_files: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn mb_to_bytes(mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", mb))
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a valid number"))?;

        let max_batch_files = env::var("MAX_BATCH_FILES")
            .unwrap_or_else(|_| MAX_BATCH_FILES.to_string())
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("MAX_BATCH_FILES must be a valid number"))?;

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| UPLOAD_DIR.to_string()),
            ),
            max_file_size_bytes: mb_to_bytes(max_file_size_mb)?,
            max_batch_files,
            allowed_extensions: parse_list(
                &env::var("ALLOWED_EXTENSIONS").unwrap_or_else(|_| ALLOWED_EXTENSIONS.to_string()),
            ),
            allowed_content_types: parse_list(
                &env::var("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|_| ALLOWED_CONTENT_TYPES.to_string()),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Default configuration rooted at `upload_dir`, without reading the environment.
    pub fn for_storage_root(upload_dir: impl Into<PathBuf>) -> Self {
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            upload_dir: upload_dir.into(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_batch_files: MAX_BATCH_FILES,
            allowed_extensions: parse_list(ALLOWED_EXTENSIONS),
            allowed_content_types: parse_list(ALLOWED_CONTENT_TYPES),
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.max_batch_files == 0 {
            return Err(anyhow::anyhow!("MAX_BATCH_FILES must be greater than 0"));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS cannot be empty"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES cannot be empty"));
        }

        if self
            .allowed_extensions
            .iter()
            .any(|ext| ext.starts_with('.') || ext.contains('/'))
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS entries must be bare extensions like 'pdf'"
            ));
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR cannot be empty"));
        }

        Ok(())
    }

    /// Upper bound for a whole multipart request body.
    ///
    /// One full batch of maximum-size files plus 1 MiB for multipart framing.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_file_size_bytes
            .saturating_mul(self.max_batch_files)
            .saturating_add(1024 * 1024)
    }
}
