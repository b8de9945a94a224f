use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file received from a client, buffered for one request.
///
/// `size` is the number of bytes the client actually sent. When the part was
/// larger than the buffering limit, `data` holds only a prefix and the file is
/// marked truncated; such a file can fail validation but never be stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    original_name: String,
    content_type: String,
    declared_size: Option<u64>,
    size: u64,
    data: Bytes,
}

impl UploadedFile {
    /// Create a fully buffered file.
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            declared_size: None,
            size: data.len() as u64,
            data,
        }
    }

    /// Create a file whose buffered prefix is shorter than the bytes received.
    pub fn truncated(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        prefix: impl Into<Bytes>,
        size: u64,
    ) -> Self {
        let data = prefix.into();
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            declared_size: None,
            size: size.max(data.len() as u64),
            data,
        }
    }

    /// Attach the byte length the client claimed for this file.
    pub fn with_declared_size(mut self, declared_size: Option<u64>) -> Self {
        self.declared_size = declared_size;
        self
    }

    pub fn name(&self) -> &str {
        &self.original_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn declared_size(&self) -> Option<u64> {
        self.declared_size
    }

    /// Number of bytes received from the client
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    pub fn is_truncated(&self) -> bool {
        (self.data.len() as u64) < self.size
    }

    /// Extension of the original name, without the dot, as the client sent it
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
    }
}

/// Outcome of validating one file. Errors are data, never control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}
