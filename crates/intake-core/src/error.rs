//! Error types module
//!
//! All request-level failures are unified under the `AppError` enum. Per-file
//! failures inside a batch are not errors: they are recorded as data in
//! [`IngestResult`](crate::models::IngestResult) and never reach this type.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "BATCH_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Too many files: {count} submitted (max: {max})")]
    BatchTooLarge { count: usize, max: usize },

    #[error("File validation failed: {}", .errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Failed to save file: {0}")]
    StorageWrite(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::BatchTooLarge { .. } => (
            400,
            "BATCH_TOO_LARGE",
            false,
            Some("Split the upload into smaller batches"),
            false,
            LogLevel::Warn,
        ),
        AppError::ValidationFailed { .. } => (
            400,
            "VALIDATION_FAILED",
            false,
            Some("Check file type, name and size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size or number of files"),
            false,
            LogLevel::Warn,
        ),
        AppError::StorageWrite(_) => (
            500,
            "STORAGE_WRITE_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::BatchTooLarge { .. } => "BatchTooLarge",
            AppError::ValidationFailed { .. } => "ValidationFailed",
            AppError::BadRequest(_) => "BadRequest",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::StorageWrite(_) => "StorageWrite",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Per-check validation messages, empty for every other variant
    pub fn validation_errors(&self) -> &[String] {
        match self {
            AppError::ValidationFailed { errors } => errors,
            _ => &[],
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BatchTooLarge { max, .. } => {
                format!("Too many files. Maximum {} files allowed", max)
            }
            AppError::ValidationFailed { .. } => "File validation failed".to_string(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::StorageWrite(_) => "Failed to save file".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_batch_too_large() {
        let err = AppError::BatchTooLarge { count: 11, max: 10 };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "BATCH_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.client_message(),
            "Too many files. Maximum 10 files allowed"
        );
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_validation_failed() {
        let err = AppError::ValidationFailed {
            errors: vec!["Empty file".to_string(), "Invalid file extension: exe".to_string()],
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(err.validation_errors().len(), 2);
        assert!(err.to_string().contains("Empty file; Invalid file extension"));
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_error_metadata_storage_write() {
        let err = AppError::StorageWrite("disk full".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_WRITE_FAILED");
        assert!(err.is_recoverable());
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to save file");
        assert!(err.validation_errors().is_empty());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("outer"));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_type(), "Internal");
        assert!(err.detailed_message().contains("Caused by"));
    }

    #[test]
    fn test_limit_overruns_log_at_warn() {
        assert_eq!(
            AppError::BatchTooLarge { count: 11, max: 10 }.log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            AppError::PayloadTooLarge("body".to_string()).log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            AppError::BadRequest("x".to_string()).log_level(),
            LogLevel::Debug
        );
    }
}
