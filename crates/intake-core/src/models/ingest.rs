use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-file outcome inside a batch.
///
/// `stored_filename` and `location` are present exactly when `success` is
/// true; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    success: bool,
    filename: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    stored_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    errors: Vec<String>,
}

impl IngestResult {
    pub fn stored(
        filename: impl Into<String>,
        stored_filename: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            filename: filename.into(),
            stored_filename: Some(stored_filename.into()),
            location: Some(location.into()),
            errors: Vec::new(),
        }
    }

    pub fn failed(filename: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            filename: filename.into(),
            stored_filename: None,
            location: None,
            errors,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Name the client supplied
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn stored_filename(&self) -> Option<&str> {
        self.stored_filename.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Aggregate of one multi-file upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub upload_time: DateTime<Utc>,
    pub results: Vec<IngestResult>,
}

impl BatchSummary {
    /// Build a summary whose counts are derived from `results`.
    pub fn new(results: Vec<IngestResult>, upload_time: DateTime<Utc>) -> Self {
        let successful = results.iter().filter(|r| r.success()).count();
        Self {
            total_files: results.len(),
            successful,
            failed: results.len() - successful,
            upload_time,
            results,
        }
    }
}

/// A single file that was validated and written to the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUpload {
    pub success: bool,
    pub original_filename: String,
    pub stored_filename: String,
    pub content_type: String,
    pub file_size: u64,
    pub upload_time: DateTime<Utc>,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_result_carries_names() {
        let result = IngestResult::stored("a.pdf", "0000.pdf", "uploads/0000.pdf");
        assert!(result.success());
        assert_eq!(result.stored_filename(), Some("0000.pdf"));
        assert_eq!(result.location(), Some("uploads/0000.pdf"));
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_failed_result_has_no_stored_name() {
        let result = IngestResult::failed("a.exe", vec!["Invalid file extension".to_string()]);
        assert!(!result.success());
        assert_eq!(result.stored_filename(), None);
        assert_eq!(result.location(), None);
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_batch_summary_counts_add_up() {
        let summary = BatchSummary::new(
            vec![
                IngestResult::stored("a.pdf", "1.pdf", "uploads/1.pdf"),
                IngestResult::failed("b.exe", vec!["bad".to_string()]),
                IngestResult::stored("c.txt", "2.txt", "uploads/2.txt"),
            ],
            Utc::now(),
        );
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.successful + summary.failed, summary.total_files);
    }

    #[test]
    fn test_empty_batch_summary() {
        let summary = BatchSummary::new(vec![], Utc::now());
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_result_serialization_omits_absent_fields() {
        let json = serde_json::to_value(IngestResult::failed("x.exe", vec!["nope".to_string()]))
            .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["filename"], "x.exe");
        assert!(json.get("stored_filename").is_none());
        assert!(json.get("location").is_none());
        assert_eq!(json["errors"][0], "nope");

        let json = serde_json::to_value(IngestResult::stored("a.pdf", "1.pdf", "uploads/1.pdf"))
            .unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("errors").is_none());
    }
}
