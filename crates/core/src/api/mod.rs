//! Remote job API boundary.
//!
//! The orchestrator only talks to the remote image-to-3D service through the
//! [`JobApi`] trait. [`OpusClient`] is the HTTP implementation; tests use
//! `testing::MockJobApi`.

mod opus;
mod types;

pub use opus::OpusClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote job API.
#[derive(Debug, Error)]
pub enum JobApiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Submission response carried no job identifier.
    #[error("Response did not contain a job_uid")]
    MissingJobUid,

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// The derived assets that can be extracted from a processed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionKind {
    Glb,
    Gaussian,
}

impl ExtractionKind {
    pub fn job_kind(&self) -> JobKind {
        match self {
            ExtractionKind::Glb => JobKind::ExtractGlb,
            ExtractionKind::Gaussian => JobKind::ExtractGaussian,
        }
    }
}

/// Operations exposed by the remote job-processing service.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Upload an image and queue it for processing.
    async fn process_image(&self, image: &ImageUpload) -> Result<JobHandle, JobApiError>;

    /// Queue an extraction job derived from a processed image job.
    async fn request_extraction(
        &self,
        kind: ExtractionKind,
        source: &JobHandle,
    ) -> Result<JobHandle, JobApiError>;

    /// Fetch the current status of a job.
    async fn job_result(&self, handle: &JobHandle) -> Result<JobResult, JobApiError>;
}
