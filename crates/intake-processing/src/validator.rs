use intake_core::{Config, UploadedFile, ValidationResult};

const MAX_FILENAME_LENGTH: usize = 255;

/// Validation violations for uploaded files
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File size mismatch: declared {declared} bytes, received {actual} bytes")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("Missing file extension (allowed: {})", .allowed.join(", "))]
    MissingExtension { allowed: Vec<String> },

    #[error("Invalid file extension: {extension} (allowed: {})", .allowed.join(", "))]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {})", .allowed.join(", "))]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Content type {content_type} does not match extension '{extension}' (expected one of: {})", .expected.join(", "))]
    ContentTypeMismatch {
        content_type: String,
        extension: String,
        expected: Vec<String>,
    },

    #[error("File content does not look like a .{extension} file")]
    ContentMismatch { extension: String },
}

/// Upload file validator
///
/// Checks name, size, extension, declared content type and (for formats with
/// a fixed signature) the leading bytes. Every check runs, so a rejected file
/// reports all of its problems at once.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

/// Normalize MIME type by stripping parameters (e.g. "text/plain; charset=utf-8" -> "text/plain").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Content types expected for well-known extensions. `None` for unknown extensions.
fn expected_content_types(extension: &str) -> Option<&'static [&'static str]> {
    let types: &'static [&'static str] = match extension {
        "jpg" | "jpeg" => &["image/jpeg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "webp" => &["image/webp"],
        "pdf" => &["application/pdf"],
        "doc" => &["application/msword"],
        "docx" => &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
        "xls" => &["application/vnd.ms-excel"],
        "xlsx" => &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
        "ppt" => &["application/vnd.ms-powerpoint"],
        "pptx" => &["application/vnd.openxmlformats-officedocument.presentationml.presentation"],
        "txt" => &["text/plain"],
        "csv" => &["text/csv", "application/csv", "text/plain"],
        "zip" => &["application/zip"],
        _ => return None,
    };
    Some(types)
}

/// Does `data` start the way a file with this extension must?
///
/// Extensions without a known signature always pass.
fn content_matches_extension(extension: &str, data: &[u8]) -> bool {
    const OLE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    const ZIP: &[u8] = b"PK\x03\x04";

    match extension {
        "pdf" => data.starts_with(b"%PDF-"),
        "png" => data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "jpg" | "jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        "gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        "docx" | "xlsx" | "pptx" | "zip" => data.starts_with(ZIP),
        "doc" | "xls" | "ppt" => data.starts_with(OLE),
        "txt" | "csv" => std::str::from_utf8(data).is_ok(),
        _ => true,
    }
}

impl FileValidator {
    pub fn new(
        max_file_size: u64,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| normalize_mime_type(&ct))
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_file_size_bytes as u64,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        )
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate a file. Never fails; violations are returned as data.
    pub fn validate(&self, file: &UploadedFile) -> ValidationResult {
        let errors = self
            .violations(file)
            .into_iter()
            .map(|e| e.to_string())
            .collect();
        ValidationResult::from_errors(errors)
    }

    /// All violations for `file`, in check order
    pub fn violations(&self, file: &UploadedFile) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = self.validate_filename(file.name()) {
            errors.push(e);
        }
        match self.validate_file_size(file.size()) {
            Err(e) => errors.push(e),
            // A truncated buffer is never storable, whatever the limit says.
            Ok(()) if file.is_truncated() => errors.push(ValidationError::FileTooLarge {
                size: file.size(),
                max: self.max_file_size,
            }),
            Ok(()) => {}
        }
        if let Some(declared) = file.declared_size() {
            if declared != file.size() {
                errors.push(ValidationError::SizeMismatch {
                    declared,
                    actual: file.size(),
                });
            }
        }

        let extension = match self.validate_extension(file.extension()) {
            Ok(ext) => Some(ext),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let content_type_ok = match self.validate_content_type(file.content_type()) {
            Ok(()) => true,
            Err(e) => {
                errors.push(e);
                false
            }
        };

        if let Some(ext) = extension.as_deref() {
            if content_type_ok {
                if let Err(e) = self.validate_extension_content_type_match(ext, file.content_type())
                {
                    errors.push(e);
                }
            }
            if !file.is_truncated() && !file.bytes().is_empty() {
                if let Err(e) = self.validate_content(ext, file.bytes()) {
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                filename = %file.name(),
                content_type = %file.content_type(),
                size = file.size(),
                violations = errors.len(),
                "File failed validation"
            );
        }

        errors
    }

    /// Validate the client-supplied name
    pub fn validate_filename(&self, filename: &str) -> Result<(), ValidationError> {
        let reason = if filename.trim().is_empty() {
            Some("filename is empty")
        } else if filename.len() > MAX_FILENAME_LENGTH {
            Some("filename is too long")
        } else if filename.contains('/') || filename.contains('\\') {
            Some("filename contains a path separator")
        } else if filename.starts_with("..") {
            Some("filename contains path traversal")
        } else if filename.chars().any(char::is_control) {
            Some("filename contains control characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ValidationError::InvalidFilename(reason.to_string())),
            None => Ok(()),
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension; returns it lower-cased
    pub fn validate_extension(&self, extension: Option<&str>) -> Result<String, ValidationError> {
        let extension = extension
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::MissingExtension {
                allowed: self.allowed_extensions.clone(),
            })?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// Validate content type against allowlist. Compares normalized MIME type only.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_mime_type(content_type);

        if !self.allowed_content_types.contains(&normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate that the content type is one expected for the extension.
    /// Unknown extensions skip this check.
    pub fn validate_extension_content_type_match(
        &self,
        extension: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = extension.to_lowercase();
        let Some(expected) = expected_content_types(&extension) else {
            tracing::debug!(
                extension = %extension,
                content_type = %content_type,
                "Unknown extension, skipping Content-Type/extension cross-validation"
            );
            return Ok(());
        };

        let normalized = normalize_mime_type(content_type);
        if !expected.iter().any(|ct| *ct == normalized) {
            return Err(ValidationError::ContentTypeMismatch {
                content_type: content_type.to_string(),
                extension,
                expected: expected.iter().map(|s| s.to_string()).collect(),
            });
        }

        Ok(())
    }

    /// Validate the leading bytes against the extension's signature
    pub fn validate_content(&self, extension: &str, data: &[u8]) -> Result<(), ValidationError> {
        let extension = extension.to_lowercase();
        if !content_matches_extension(&extension, data) {
            return Err(ValidationError::ContentMismatch { extension });
        }
        Ok(())
    }
}
