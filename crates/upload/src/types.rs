//! Records produced by upload processing.
//!
//! Both types are built fresh for every request and dropped once the response
//! has been written.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Message attached to every successful result.
pub const SUCCESS_MESSAGE: &str = "upload processed successfully";

/// Outcome of an upload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    /// Part of the wire format; processing errors never build a result.
    Failure,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Success => "success",
            UploadStatus::Failure => "failure",
        }
    }
}

/// Metadata for one uploaded file part.
///
/// `name` is whatever the client sent. It may be empty or contain path
/// separators and must never be joined onto a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    /// Exact payload length in bytes.
    pub size: u64,
    /// The part's own `Content-Type` header; empty when the part had none.
    pub content_type: String,
}

/// Form fields and file descriptors extracted from one request.
///
/// Serializes as `{"message", "status", "files", "form"}` where `files` and
/// `form` are omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub message: String,
    pub status: UploadStatus,
    /// File parts in the order they appeared in the body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileDescriptor>,
    /// First submitted value for each scalar field name.
    #[serde(rename = "form", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl UploadResult {
    /// A successful result holding the given fields and files.
    pub fn success(fields: BTreeMap<String, String>, files: Vec<FileDescriptor>) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            status: UploadStatus::Success,
            files,
            fields,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }

    /// Sum of all file sizes.
    pub fn total_file_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UploadStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(UploadStatus::Failure.as_str(), "failure");
    }

    #[test]
    fn failure_status_parses_from_wire() {
        let status: UploadStatus = serde_json::from_str("\"failure\"").unwrap();
        assert_eq!(status, UploadStatus::Failure);
    }

    #[test]
    fn empty_containers_are_omitted() {
        let result = UploadResult::success(BTreeMap::new(), Vec::new());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "success");
        assert!(value.get("files").is_none());
        assert!(value.get("form").is_none());
    }

    #[test]
    fn total_file_bytes_sums_sizes() {
        let files = vec![
            FileDescriptor {
                name: "p.txt".into(),
                size: 5,
                content_type: String::new(),
            },
            FileDescriptor {
                name: "q.txt".into(),
                size: 7,
                content_type: String::new(),
            },
        ];
        assert_eq!(
            UploadResult::success(BTreeMap::new(), files).total_file_bytes(),
            12
        );
    }
}
