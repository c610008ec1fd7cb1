//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the remote job API so the pipeline can be
//! exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use imagemesh_core::testing::{fixtures, MockJobApi};
//!
//! let api = MockJobApi::new();
//! api.queue_submission(JobKind::ProcessImage, "A1").await;
//! api.script_statuses("A1", vec![fixtures::preview("http://x/preview.jpg")]).await;
//!
//! let orchestrator = Orchestrator::new(config, polling, Arc::new(api.clone()));
//! ```

mod mock_job_api;

pub use mock_job_api::{MockJobApi, RecordedSubmission};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::api::{Artifact, ImageUpload, JobResult};
    use crate::job::PollingConfig;

    /// A small JPEG-named upload.
    pub fn image_upload() -> ImageUpload {
        ImageUpload::new("chair.jpg", vec![0xff, 0xd8, 0xff, 0xe0])
    }

    /// Polling config that never waits long and gives up after `max_attempts`.
    pub fn fast_polling(max_attempts: u32) -> PollingConfig {
        PollingConfig {
            interval_ms: 1,
            max_attempts,
        }
    }

    /// Completed image-processing result with a single preview artifact.
    pub fn preview(url: &str) -> JobResult {
        let extension = url.rsplit('.').next().unwrap_or("mp4");
        JobResult::completed(vec![Artifact::new(extension, url)])
    }

    /// Completed GLB extraction result.
    pub fn glb(url: &str) -> JobResult {
        JobResult::completed(vec![Artifact::new("glb", url)])
    }

    /// Completed Gaussian extraction result.
    pub fn gaussian(url: &str) -> JobResult {
        JobResult::completed(vec![Artifact::new("ply", url)])
    }
}
