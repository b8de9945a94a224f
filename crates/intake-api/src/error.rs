//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors convert into
//! `AppError` first so every failure renders with the same status, body and
//! log level.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use intake_core::{AppError, Config, ErrorMetadata, LogLevel};
use intake_processing::IngestError;
use intake_storage::StorageError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Per-check validation messages
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(app_error: &AppError, include_details: bool) -> Self {
        Self {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            errors: app_error.validation_errors().to_vec(),
            details: include_details.then(|| app_error.detailed_message()),
            error_type: include_details.then(|| app_error.error_type().to_string()),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse and AppError both live in other crates)
///
/// `details`/`error_type` stay hidden until a handler applies the runtime
/// config with [`HttpAppError::for_config`].
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    expose_details: bool,
}

impl HttpAppError {
    pub fn new(error: AppError) -> Self {
        Self {
            error,
            expose_details: false,
        }
    }

    /// Expose details of non-sensitive errors unless running in production.
    pub fn for_config(mut self, config: &Config) -> Self {
        self.expose_details = !config.is_production();
        self
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError::new(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let include_details = self.expose_details && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, include_details);

        (status, Json(body)).into_response()
    }
}

// Domain error conversions

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::UploadFailed(msg) => AppError::StorageWrite(msg),
            StorageError::AlreadyExists(name) => {
                AppError::StorageWrite(format!("stored name already taken: {}", name))
            }
            StorageError::IoError(err) => AppError::StorageWrite(format!("IO error: {}", err)),
            StorageError::InvalidName(name) => {
                AppError::Internal(format!("invalid stored name: {}", name))
            }
            StorageError::NotFound(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError::new(app)
    }
}

impl From<IngestError> for HttpAppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::BatchTooLarge { count, max } => {
                HttpAppError::new(AppError::BatchTooLarge { count, max })
            }
            IngestError::Validation(errors) => {
                HttpAppError::new(AppError::ValidationFailed { errors })
            }
            IngestError::Storage(err) => HttpAppError::from(err),
        }
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!("Request body too large: {}", err.body_text()))
        } else {
            AppError::from(anyhow::Error::new(err).context("Failed to read multipart body"))
        };
        HttpAppError::new(app)
    }
}
