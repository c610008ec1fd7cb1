//! Mock job API for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{
    ExtractionKind, ImageUpload, JobApi, JobApiError, JobHandle, JobKind, JobResult,
};

/// A recorded submission for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    /// Which job was requested.
    pub kind: JobKind,
    /// Source job for extractions.
    pub source: Option<JobHandle>,
    /// Uploaded file name for image submissions.
    pub file_name: Option<String>,
    /// Handle returned to the caller (None when the submission failed).
    pub handle: Option<JobHandle>,
}

/// Mock implementation of the JobApi trait.
///
/// Provides controllable behavior for testing:
/// - Queue the job uid each submission returns
/// - Script the sequence of statuses returned for a job uid
/// - Inject submission and status errors
/// - Record every call for assertions
///
/// # Example
///
/// ```rust,ignore
/// use imagemesh_core::testing::MockJobApi;
///
/// let api = MockJobApi::new();
/// api.queue_submission(JobKind::ProcessImage, "A1").await;
/// api.script_statuses("A1", vec![JobResult::pending(), fixtures::preview("http://x/p.jpg")]).await;
///
/// // run the pipeline...
///
/// assert_eq!(api.status_query_count("A1").await, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockJobApi {
    /// Recorded submissions.
    submissions: Arc<RwLock<Vec<RecordedSubmission>>>,
    /// Handles to return per job kind, in order.
    queued_handles: Arc<RwLock<HashMap<JobKind, VecDeque<JobHandle>>>>,
    /// Errors to return on the next submission of a job kind.
    submission_errors: Arc<RwLock<HashMap<JobKind, JobApiError>>>,
    /// Scripted statuses per job uid. The last entry repeats.
    statuses: Arc<RwLock<HashMap<JobHandle, VecDeque<JobResult>>>>,
    /// Every status query, in order.
    status_queries: Arc<RwLock<Vec<JobHandle>>>,
    /// If set, the next status query fails with this error.
    next_status_error: Arc<RwLock<Option<JobApiError>>>,
}

impl MockJobApi {
    /// Create a new mock API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handle returned by the next submission of `kind`.
    pub async fn queue_submission(&self, kind: JobKind, job_uid: &str) {
        self.queued_handles
            .write()
            .await
            .entry(kind)
            .or_default()
            .push_back(JobHandle::from(job_uid));
    }

    /// Make the next submission of `kind` fail.
    pub async fn set_submission_error(&self, kind: JobKind, error: JobApiError) {
        self.submission_errors.write().await.insert(kind, error);
    }

    /// Script the statuses returned for a job uid, in order.
    pub async fn script_statuses(&self, job_uid: &str, results: Vec<JobResult>) {
        self.statuses
            .write()
            .await
            .insert(JobHandle::from(job_uid), results.into());
    }

    /// Make the next status query fail.
    pub async fn set_status_error(&self, error: JobApiError) {
        *self.next_status_error.write().await = Some(error);
    }

    /// Get all recorded submissions.
    pub async fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.read().await.clone()
    }

    /// Number of submissions of a given kind.
    pub async fn submission_count(&self, kind: JobKind) -> usize {
        self.submissions
            .read()
            .await
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Every status query, in order.
    pub async fn status_queries(&self) -> Vec<JobHandle> {
        self.status_queries.read().await.clone()
    }

    /// Number of status queries for a job uid.
    pub async fn status_query_count(&self, job_uid: &str) -> usize {
        self.status_queries
            .read()
            .await
            .iter()
            .filter(|h| h.as_str() == job_uid)
            .count()
    }

    async fn record_submission(
        &self,
        kind: JobKind,
        source: Option<JobHandle>,
        file_name: Option<String>,
    ) -> Result<JobHandle, JobApiError> {
        let error = self.submission_errors.write().await.remove(&kind);

        let result = match error {
            Some(err) => Err(err),
            None => {
                let queued = self
                    .queued_handles
                    .write()
                    .await
                    .get_mut(&kind)
                    .and_then(|q| q.pop_front());
                match queued {
                    Some(handle) => Ok(handle),
                    None => {
                        let n = self.submission_count(kind).await + 1;
                        Ok(JobHandle::new(format!("{}-{}", Self::prefix(kind), n)))
                    }
                }
            }
        };

        self.submissions.write().await.push(RecordedSubmission {
            kind,
            source,
            file_name,
            handle: result.as_ref().ok().cloned(),
        });

        result
    }

    fn prefix(kind: JobKind) -> &'static str {
        match kind {
            JobKind::ProcessImage => "image",
            JobKind::ExtractGlb => "glb",
            JobKind::ExtractGaussian => "gaussian",
        }
    }
}

#[async_trait]
impl JobApi for MockJobApi {
    async fn process_image(&self, image: &ImageUpload) -> Result<JobHandle, JobApiError> {
        self.record_submission(JobKind::ProcessImage, None, Some(image.file_name.clone()))
            .await
    }

    async fn request_extraction(
        &self,
        kind: ExtractionKind,
        source: &JobHandle,
    ) -> Result<JobHandle, JobApiError> {
        self.record_submission(kind.job_kind(), Some(source.clone()), None)
            .await
    }

    async fn job_result(&self, handle: &JobHandle) -> Result<JobResult, JobApiError> {
        self.status_queries.write().await.push(handle.clone());

        if let Some(err) = self.next_status_error.write().await.take() {
            return Err(err);
        }

        let mut statuses = self.statuses.write().await;
        let queue = statuses.get_mut(handle).ok_or_else(|| JobApiError::ApiError {
            status: 404,
            message: format!("unknown job {}", handle),
        })?;

        let result = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        result.ok_or_else(|| JobApiError::ParseError(format!("no status scripted for {}", handle)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::JobStatus;

    #[tokio::test]
    async fn test_generated_handles() {
        let api = MockJobApi::new();
        let upload = ImageUpload::new("a.jpg", vec![]);

        let first = api.process_image(&upload).await.unwrap();
        let second = api.process_image(&upload).await.unwrap();

        assert_eq!(first.as_str(), "image-1");
        assert_eq!(second.as_str(), "image-2");
    }

    #[tokio::test]
    async fn test_last_status_repeats() {
        let api = MockJobApi::new();
        api.script_statuses("A1", vec![JobResult::pending(), JobResult::failed()])
            .await;
        let handle = JobHandle::from("A1");

        assert_eq!(api.job_result(&handle).await.unwrap().status, JobStatus::Pending);
        assert_eq!(api.job_result(&handle).await.unwrap().status, JobStatus::Failed);
        assert_eq!(api.job_result(&handle).await.unwrap().status, JobStatus::Failed);
        assert_eq!(api.status_query_count("A1").await, 3);
    }

    #[tokio::test]
    async fn test_unknown_job_is_an_error() {
        let api = MockJobApi::new();
        let result = api.job_result(&JobHandle::from("nope")).await;
        assert!(matches!(result, Err(JobApiError::ApiError { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_submission_error_is_one_shot() {
        let api = MockJobApi::new();
        api.set_submission_error(JobKind::ExtractGlb, JobApiError::MissingJobUid)
            .await;
        let source = JobHandle::from("A1");

        assert!(api
            .request_extraction(ExtractionKind::Glb, &source)
            .await
            .is_err());
        assert!(api
            .request_extraction(ExtractionKind::Glb, &source)
            .await
            .is_ok());

        let calls = api.submissions().await;
        assert_eq!(calls.len(), 2);
        assert!(calls[0].handle.is_none());
        assert!(calls[1].handle.is_some());
    }
}
