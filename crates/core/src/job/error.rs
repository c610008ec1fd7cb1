//! Submission and polling errors.

use thiserror::Error;

use crate::api::{JobApiError, JobHandle, JobKind};

/// A job could not be created on the remote service.
#[derive(Debug, Error)]
#[error("{kind} submission failed: {source}")]
pub struct SubmissionError {
    pub kind: JobKind,
    #[source]
    pub source: JobApiError,
}

/// Polling stopped before the job reached a terminal status.
///
/// A remote `FAILED` status is not a `PollError`; it is returned as a normal
/// [`JobResult`](crate::api::JobResult).
#[derive(Debug, Error)]
pub enum PollError {
    /// A status query could not be completed or parsed.
    #[error("status query for job {job_uid} failed: {source}")]
    Transport {
        job_uid: JobHandle,
        #[source]
        source: JobApiError,
    },

    /// The job did not reach a terminal status within the attempt limit.
    #[error("job {job_uid} still pending after {attempts} status queries")]
    Timeout { job_uid: JobHandle, attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SubmissionError {
            kind: JobKind::ExtractGlb,
            source: JobApiError::MissingJobUid,
        };
        assert_eq!(
            err.to_string(),
            "GLB extraction submission failed: Response did not contain a job_uid"
        );

        let err = PollError::Timeout {
            job_uid: JobHandle::from("A1"),
            attempts: 3,
        };
        assert_eq!(err.to_string(), "job A1 still pending after 3 status queries");
    }
}
