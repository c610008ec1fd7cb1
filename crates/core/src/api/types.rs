//! Types for the remote job API.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a remote job (`job_uid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobHandle {
    fn from(uid: &str) -> Self {
        Self::new(uid)
    }
}

/// The kind of remote job being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    ProcessImage,
    ExtractGlb,
    ExtractGaussian,
}

impl JobKind {
    /// Human readable label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            JobKind::ProcessImage => "image processing",
            JobKind::ExtractGlb => "GLB extraction",
            JobKind::ExtractGaussian => "Gaussian extraction",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remote job status.
///
/// Only `COMPLETED` and `FAILED` are terminal; every other value the API
/// reports is treated as still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether polling stops at this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }
}

/// A typed output produced by a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// File type tag (e.g. "glb", "ply", "mp4").
    #[serde(default)]
    pub extension: String,
    /// Where the artifact can be downloaded from.
    #[serde(default)]
    pub url: String,
}

impl Artifact {
    pub fn new(extension: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            url: url.into(),
        }
    }
}

/// Status report for a job, as returned by `GET /job_result/{job_uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub status: JobStatus,
    /// Produced artifacts, in the order the API lists them.
    #[serde(default)]
    pub urls: Vec<Artifact>,
}

impl JobResult {
    pub fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            urls: Vec::new(),
        }
    }

    pub fn completed(urls: Vec<Artifact>) -> Self {
        Self {
            status: JobStatus::Completed,
            urls,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: JobStatus::Failed,
            urls: Vec::new(),
        }
    }
}

/// An image to upload for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// MIME type for an image file name. Unknown extensions upload as JPEG.
fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_status_parsing() {
        let r: JobResult = serde_json::from_str(r#"{"status":"COMPLETED","urls":[]}"#).unwrap();
        assert_eq!(r.status, JobStatus::Completed);

        let r: JobResult = serde_json::from_str(r#"{"status":"FAILED"}"#).unwrap();
        assert_eq!(r.status, JobStatus::Failed);
        assert!(r.urls.is_empty());

        let r: JobResult = serde_json::from_str(r#"{"status":"IN_QUEUE"}"#).unwrap();
        assert_eq!(r.status, JobStatus::Pending);
        assert!(!r.status.is_terminal());
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let r: JobResult = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(r.status, JobStatus::Pending);
    }

    #[test]
    fn test_artifact_missing_fields() {
        let r: JobResult =
            serde_json::from_str(r#"{"status":"COMPLETED","urls":[{"extension":"glb"}]}"#)
                .unwrap();
        assert_eq!(r.urls[0].extension, "glb");
        assert_eq!(r.urls[0].url, "");
    }

    #[test]
    fn test_status_serializes_screaming() {
        let json = serde_json::to_string(&JobStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }

    #[test]
    fn test_handle_display() {
        let handle = JobHandle::from("A1");
        assert_eq!(handle.to_string(), "A1");
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"A1\"");
    }

    #[test]
    fn test_upload_content_type() {
        assert_eq!(ImageUpload::new("chair.JPG", vec![]).content_type, "image/jpeg");
        assert_eq!(ImageUpload::new("chair.png", vec![]).content_type, "image/png");
        assert_eq!(ImageUpload::new("chair.webp", vec![]).content_type, "image/webp");
        assert_eq!(ImageUpload::new("chair", vec![]).content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_upload_from_path() {
        let mut file = NamedTempFile::with_suffix(".png").unwrap();
        file.write_all(b"\x89PNG").unwrap();

        let upload = ImageUpload::from_path(file.path()).await.unwrap();
        assert_eq!(upload.bytes, b"\x89PNG");
        assert_eq!(upload.content_type, "image/png");
        assert!(upload.file_name.ends_with(".png"));
    }
}
