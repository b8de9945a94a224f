//! Stored-name generation.
//!
//! Name format: `{uuid-v4}{.ext}` where `.ext` is the extension of the
//! client-supplied name, kept as sent. Extensions that are not plain ASCII
//! alphanumerics are dropped so a stored name is always a safe flat filename.

use std::path::Path;
use uuid::Uuid;

/// Generate a collision-resistant stored name for `original_filename`.
pub fn generate_stored_name(original_filename: &str) -> String {
    let id = Uuid::new_v4();
    match safe_extension(original_filename) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn safe_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
}
