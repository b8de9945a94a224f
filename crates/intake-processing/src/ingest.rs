//! Ingestion pipeline: validate → name → store.
//!
//! [`Ingestor`] owns the validator and the storage handle. Multi-file batches
//! are processed sequentially in input order; one file's failure never
//! affects another's outcome.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use intake_core::{BatchSummary, IngestResult, StoredUpload, UploadedFile};
use intake_storage::{generate_stored_name, Storage, StorageError, StoredObject};

use crate::validator::FileValidator;

/// Attempts at finding a free stored name before giving up.
const MAX_NAME_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Too many files: {count} (max: {max})")]
    BatchTooLarge { count: usize, max: usize },

    #[error("File validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Failed to save: {0}")]
    Storage(#[from] StorageError),
}

pub struct Ingestor {
    validator: FileValidator,
    storage: Arc<dyn Storage>,
}

impl Ingestor {
    pub fn new(validator: FileValidator, storage: Arc<dyn Storage>) -> Self {
        Self { validator, storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Ingest a batch of files.
    ///
    /// Fails only when the batch holds more than `max_count` files, in which
    /// case nothing is validated or written. Otherwise every file gets exactly
    /// one result, in input order.
    pub async fn ingest(
        &self,
        files: Vec<UploadedFile>,
        max_count: usize,
    ) -> Result<BatchSummary, IngestError> {
        if files.len() > max_count {
            return Err(IngestError::BatchTooLarge {
                count: files.len(),
                max: max_count,
            });
        }

        let upload_time = Utc::now();
        let mut results = Vec::with_capacity(files.len());

        for file in &files {
            let result = match self.process(file).await {
                Ok(stored) => IngestResult::stored(file.name(), stored.name, stored.location),
                Err(IngestError::Validation(errors)) => IngestResult::failed(file.name(), errors),
                Err(IngestError::Storage(e)) => IngestResult::failed(
                    file.name(),
                    vec![format!("Failed to save: {}", e.client_reason())],
                ),
                Err(e) => IngestResult::failed(file.name(), vec![e.to_string()]),
            };
            results.push(result);
        }

        let summary = BatchSummary::new(results, upload_time);
        tracing::info!(
            total_files = summary.total_files,
            successful = summary.successful,
            failed = summary.failed,
            "Batch ingestion complete"
        );

        Ok(summary)
    }

    /// Ingest a single file, surfacing rejection as an error.
    pub async fn ingest_one(&self, file: &UploadedFile) -> Result<StoredUpload, IngestError> {
        let upload_time: DateTime<Utc> = Utc::now();
        let stored = self.process(file).await?;

        Ok(StoredUpload {
            success: true,
            original_filename: file.name().to_string(),
            stored_filename: stored.name,
            content_type: file.content_type().to_string(),
            file_size: stored.size,
            upload_time,
            location: stored.location,
        })
    }

    async fn process(&self, file: &UploadedFile) -> Result<StoredObject, IngestError> {
        let validation = self.validator.validate(file);
        if !validation.valid {
            tracing::warn!(
                filename = %file.name(),
                errors = ?validation.errors,
                "Rejected upload"
            );
            return Err(IngestError::Validation(validation.errors));
        }

        let stored = self.store_with_fresh_name(file).await.map_err(|e| {
            tracing::warn!(
                filename = %file.name(),
                error = %e,
                "Failed to store upload"
            );
            IngestError::Storage(e)
        })?;

        tracing::info!(
            filename = %file.name(),
            stored_filename = %stored.name,
            size_bytes = stored.size,
            "File ingested"
        );

        Ok(stored)
    }

    async fn store_with_fresh_name(
        &self,
        file: &UploadedFile,
    ) -> Result<StoredObject, StorageError> {
        let mut attempt = 1;
        loop {
            let stored_name = generate_stored_name(file.name());
            match self.storage.store(&stored_name, file.bytes().clone()).await {
                Err(StorageError::AlreadyExists(name)) if attempt < MAX_NAME_ATTEMPTS => {
                    tracing::debug!(stored_name = %name, attempt, "Stored name taken, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
