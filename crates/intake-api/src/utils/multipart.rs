//! Multipart extraction for upload handlers
//!
//! Parts are buffered in memory up to the per-file limit. Bytes past the limit
//! are counted but dropped, so an oversized file still reports its real size
//! while memory stays bounded.

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use axum::http::header::CONTENT_LENGTH;
use bytes::BytesMut;
use intake_core::{AppError, UploadedFile};

use crate::error::HttpAppError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

async fn buffer_field(
    mut field: Field<'_>,
    max_file_size: usize,
) -> Result<UploadedFile, HttpAppError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();
    let declared_size = field
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());

    let mut buf = BytesMut::new();
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        let room = max_file_size.saturating_sub(buf.len());
        if room > 0 {
            buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
    }

    let file = if size > buf.len() as u64 {
        tracing::debug!(
            filename = %filename,
            size,
            max_file_size,
            "Multipart part exceeds file size limit, buffered prefix only"
        );
        UploadedFile::truncated(filename, content_type, buf.freeze(), size)
    } else {
        UploadedFile::new(filename, content_type, buf.freeze())
    };

    Ok(file.with_declared_size(declared_size))
}

/// Extract the single file sent under `field_name`.
/// Other fields are ignored; a second `field_name` part is rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    field_name: &str,
    max_file_size: usize,
) -> Result<UploadedFile, HttpAppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        if file.is_some() {
            return Err(AppError::BadRequest(format!(
                "Multiple file fields are not allowed; send exactly one field named '{}'",
                field_name
            ))
            .into());
        }
        file = Some(buffer_field(field, max_file_size).await?);
    }

    file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()).into())
}

/// Extract every file sent under `field_name`, in order.
///
/// Once more than `max_files` parts have been seen, remaining parts are only
/// counted and the request fails with `BatchTooLarge`; nothing past the limit
/// is buffered.
pub async fn extract_multipart_files(
    mut multipart: Multipart,
    field_name: &str,
    max_file_size: usize,
    max_files: usize,
) -> Result<Vec<UploadedFile>, HttpAppError> {
    let mut files = Vec::new();
    let mut count = 0;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        count += 1;
        if count > max_files {
            files.clear();
            continue;
        }
        files.push(buffer_field(field, max_file_size).await?);
    }

    if count > max_files {
        return Err(AppError::BatchTooLarge {
            count,
            max: max_files,
        }
        .into());
    }
    if files.is_empty() {
        return Err(AppError::BadRequest("No files provided".to_string()).into());
    }

    Ok(files)
}
