use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::multipart::{extract_multipart_file, extract_multipart_files};
use axum::{
    extract::{Multipart, State},
    Json,
};
use intake_core::{BatchSummary, StoredUpload};
use std::sync::Arc;

/// `POST /upload/single`: one file in the `file` field.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_single(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<StoredUpload>, HttpAppError> {
    ingest_single(&state, multipart)
        .await
        .map(Json)
        .map_err(|e| e.for_config(&state.config))
}

/// `POST /upload/multiple`: up to the configured batch size in `files` fields.
///
/// Returns 200 with a per-file summary even when every file was rejected.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_multiple(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<BatchSummary>, HttpAppError> {
    ingest_batch(&state, multipart)
        .await
        .map(Json)
        .map_err(|e| e.for_config(&state.config))
}

async fn ingest_single(state: &AppState, multipart: Multipart) -> Result<StoredUpload, HttpAppError> {
    let file =
        extract_multipart_file(multipart, "file", state.config.max_file_size_bytes).await?;

    Ok(state.ingestor.ingest_one(&file).await?)
}

async fn ingest_batch(state: &AppState, multipart: Multipart) -> Result<BatchSummary, HttpAppError> {
    let max_files = state.config.max_batch_files;
    let files = extract_multipart_files(
        multipart,
        "files",
        state.config.max_file_size_bytes,
        max_files,
    )
    .await?;

    Ok(state.ingestor.ingest(files, max_files).await?)
}
