//! Fixed-interval status polling.

use tracing::{debug, info, warn};

use crate::api::{JobApi, JobHandle, JobKind, JobResult, JobStatus};

use super::config::PollingConfig;
use super::error::PollError;

/// Polls a job until it reaches a terminal status.
#[derive(Debug, Clone, Default)]
pub struct Poller {
    config: PollingConfig,
}

impl Poller {
    pub fn new(config: PollingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollingConfig {
        &self.config
    }

    /// Query the job status until it is `COMPLETED` or `FAILED`.
    ///
    /// A `FAILED` job is returned as a result, not an error. Queries are
    /// issued one at a time with a fixed delay in between.
    pub async fn poll_until_terminal(
        &self,
        api: &dyn JobApi,
        kind: JobKind,
        handle: &JobHandle,
    ) -> Result<JobResult, PollError> {
        let limit = self.config.attempt_limit();
        let interval = self.config.interval();
        let mut attempts: u32 = 0;

        loop {
            let result = api
                .job_result(handle)
                .await
                .map_err(|source| PollError::Transport {
                    job_uid: handle.clone(),
                    source,
                })?;
            attempts += 1;

            match result.status {
                JobStatus::Completed => {
                    info!("{} completed (job {})", kind, handle);
                    return Ok(result);
                }
                JobStatus::Failed => {
                    warn!("{} failed (job {})", kind, handle);
                    return Ok(result);
                }
                JobStatus::Pending => {}
            }

            if limit.is_some_and(|max| attempts >= max) {
                warn!(
                    "{} still pending after {} status queries (job {})",
                    kind, attempts, handle
                );
                return Err(PollError::Timeout {
                    job_uid: handle.clone(),
                    attempts,
                });
            }

            debug!(
                "Waiting for {} to complete (job {}, attempt {})",
                kind, handle, attempts
            );
            tokio::time::sleep(interval).await;
        }
    }
}
