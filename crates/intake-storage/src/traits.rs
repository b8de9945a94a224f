//! Storage abstraction trait
//!
//! This module defines the Storage trait that every storage backend implements.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid stored name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Short reason safe to show to clients: no paths, no object names.
    pub fn client_reason(&self) -> String {
        match self {
            StorageError::UploadFailed(_) => "write error".to_string(),
            StorageError::AlreadyExists(_) => "name already taken".to_string(),
            StorageError::InvalidName(_) => "invalid stored name".to_string(),
            StorageError::IoError(e) => e.kind().to_string(),
            StorageError::NotFound(_)
            | StorageError::DownloadFailed(_)
            | StorageError::ConfigError(_) => "storage unavailable".to_string(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An object written to the storage root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
    pub location: String,
    pub size: u64,
}

/// Storage abstraction trait
///
/// The ingestion pipeline only talks to storage through this trait, so the
/// storage root is injected rather than global and tests can substitute a
/// backend that fails on demand.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a new object under `stored_name`.
    ///
    /// Never overwrites: if the name is taken the call fails with
    /// [`StorageError::AlreadyExists`]. A failed call leaves nothing behind.
    async fn store(&self, stored_name: &str, data: Bytes) -> StorageResult<StoredObject>;

    /// Read an object back
    async fn read(&self, stored_name: &str) -> StorageResult<Vec<u8>>;

    /// Check if an object exists
    async fn exists(&self, stored_name: &str) -> StorageResult<bool>;

    /// Where an object with this name lives (or would live)
    fn location(&self, stored_name: &str) -> String;

    /// Verify the backend is reachable and writable
    async fn health_check(&self) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_reason_hides_paths() {
        let errors = [
            StorageError::UploadFailed("Failed to create file /srv/uploads/.a.part".to_string()),
            StorageError::AlreadyExists("0000.pdf".to_string()),
            StorageError::ConfigError("/srv/uploads is read-only".to_string()),
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "/srv/uploads/x",
            )),
        ];

        for err in &errors {
            let reason = err.client_reason();
            assert!(!reason.contains('/'), "{reason:?} leaks a path");
            assert!(!reason.contains("0000"), "{reason:?} leaks a name");
        }
        assert_eq!(errors[0].client_reason(), "write error");
        assert_eq!(errors[3].client_reason(), "permission denied");
    }
}
