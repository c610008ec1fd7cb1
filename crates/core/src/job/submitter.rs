//! Job submission.

use tracing::{info, warn};

use crate::api::{ExtractionKind, ImageUpload, JobApi, JobHandle, JobKind};

use super::error::SubmissionError;

/// A request to create one remote job.
#[derive(Debug, Clone)]
pub enum JobRequest {
    /// Upload an image for processing (multipart body).
    ProcessImage(ImageUpload),
    /// Extract a GLB mesh from a processed image job.
    ExtractGlb { source: JobHandle },
    /// Extract a Gaussian splat PLY from a processed image job.
    ExtractGaussian { source: JobHandle },
}

impl JobRequest {
    pub fn extraction(kind: ExtractionKind, source: JobHandle) -> Self {
        match kind {
            ExtractionKind::Glb => JobRequest::ExtractGlb { source },
            ExtractionKind::Gaussian => JobRequest::ExtractGaussian { source },
        }
    }

    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::ProcessImage(_) => JobKind::ProcessImage,
            JobRequest::ExtractGlb { .. } => JobKind::ExtractGlb,
            JobRequest::ExtractGaussian { .. } => JobKind::ExtractGaussian,
        }
    }
}

/// Create a remote job and return its handle.
///
/// Failures are not retried.
pub async fn submit(api: &dyn JobApi, request: &JobRequest) -> Result<JobHandle, SubmissionError> {
    let kind = request.kind();

    let result = match request {
        JobRequest::ProcessImage(image) => api.process_image(image).await,
        JobRequest::ExtractGlb { source } => {
            api.request_extraction(ExtractionKind::Glb, source).await
        }
        JobRequest::ExtractGaussian { source } => {
            api.request_extraction(ExtractionKind::Gaussian, source).await
        }
    };

    match result {
        Ok(handle) => {
            info!("{} job queued. Job UID: {}", kind, handle);
            Ok(handle)
        }
        Err(source) => {
            warn!("{} submission failed: {}", kind, source);
            Err(SubmissionError { kind, source })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::JobApiError;
    use crate::testing::MockJobApi;

    #[tokio::test]
    async fn test_submit_image_returns_handle() {
        let api = MockJobApi::new();
        api.queue_submission(JobKind::ProcessImage, "A1").await;

        let request = JobRequest::ProcessImage(ImageUpload::new("chair.jpg", vec![1, 2, 3]));
        let handle = submit(&api, &request).await.unwrap();

        assert_eq!(handle.as_str(), "A1");
        let calls = api.submissions().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, JobKind::ProcessImage);
        assert_eq!(calls[0].source, None);
    }

    #[tokio::test]
    async fn test_submit_extraction_passes_source_handle() {
        let api = MockJobApi::new();
        api.queue_submission(JobKind::ExtractGaussian, "G1").await;

        let request = JobRequest::extraction(ExtractionKind::Gaussian, JobHandle::from("A1"));
        assert_eq!(request.kind(), JobKind::ExtractGaussian);

        let handle = submit(&api, &request).await.unwrap();
        assert_eq!(handle.as_str(), "G1");

        let calls = api.submissions().await;
        assert_eq!(calls[0].source, Some(JobHandle::from("A1")));
    }

    #[tokio::test]
    async fn test_submit_error_carries_kind() {
        let api = MockJobApi::new();
        api.set_submission_error(JobKind::ExtractGlb, JobApiError::MissingJobUid)
            .await;

        let request = JobRequest::extraction(ExtractionKind::Glb, JobHandle::from("A1"));
        let err = submit(&api, &request).await.unwrap_err();

        assert_eq!(err.kind, JobKind::ExtractGlb);
        assert!(matches!(err.source, JobApiError::MissingJobUid));
    }
}
