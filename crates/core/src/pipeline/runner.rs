//! Pipeline controller.
//!
//! Sequences one run: submit image -> poll -> check preview -> GLB
//! extraction -> Gaussian extraction. Stages run one after another on the
//! caller's task; the only suspension point is the poll delay.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::{ImageUpload, JobApi, JobHandle, JobKind, JobStatus};
use crate::job::{
    extract_asset, extract_first, submit, AssetKind, JobRequest, Poller, PollingConfig,
};

use super::config::{FailurePolicy, PipelineConfig, StatusHandle};
use super::types::{PipelineError, PipelineReport, PipelineState, Stage, StageOutcome};

/// Callback invoked on every controller state transition.
pub type StateCallback = Arc<dyn Fn(PipelineState) + Send + Sync>;

/// Drives an image through processing and asset extraction.
pub struct Orchestrator {
    config: PipelineConfig,
    poller: Poller,
    api: Arc<dyn JobApi>,
    state_callback: Option<StateCallback>,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(config: PipelineConfig, polling: PollingConfig, api: Arc<dyn JobApi>) -> Self {
        Self {
            config,
            poller: Poller::new(polling),
            api,
            state_callback: None,
        }
    }

    /// Set a callback to observe state transitions.
    pub fn with_state_callback(mut self, callback: StateCallback) -> Self {
        self.state_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn transition(&self, state: PipelineState) {
        debug!("Pipeline state -> {:?}", state);
        if let Some(ref callback) = self.state_callback {
            callback(state);
        }
    }

    /// Run the full pipeline for one image.
    ///
    /// Returns a report with whatever URLs were produced. Transport failures
    /// abort the run with an error.
    pub async fn run(&self, image: ImageUpload) -> Result<PipelineReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", run_id = %run_id);
        self.run_inner(run_id, image).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        image: ImageUpload,
    ) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport::new(run_id);
        self.transition(PipelineState::NotStarted);

        info!("Submitting image '{}'", image.file_name);
        let image_handle = submit(self.api.as_ref(), &JobRequest::ProcessImage(image)).await?;
        self.transition(PipelineState::ImageSubmitted);

        self.transition(PipelineState::ImagePolling);
        let image_result = self
            .poller
            .poll_until_terminal(self.api.as_ref(), JobKind::ProcessImage, &image_handle)
            .await?;

        let preview = extract_first(&image_result).map(str::to_string);
        let image_outcome = match (&preview, image_result.status) {
            (Some(url), _) => {
                info!("Preview URL: {}", url);
                StageOutcome::Completed
            }
            (None, JobStatus::Failed) => {
                warn!("Image processing failed, skipping extractions");
                StageOutcome::Failed
            }
            (None, _) => {
                warn!("Image processing produced no preview, skipping extractions");
                StageOutcome::NoArtifact
            }
        };
        report.record(Stage::Image, Some(image_handle.clone()), image_outcome);
        report.preview_url = preview;
        report.image_result = Some(image_result);

        if image_outcome.is_success() {
            self.transition(PipelineState::ImageDone);
            self.run_extractions(&mut report, &image_handle).await?;
        } else {
            self.transition(PipelineState::StageFailed(Stage::Image));
            report.record(Stage::Glb, None, StageOutcome::Skipped);
            report.record(Stage::Gaussian, None, StageOutcome::Skipped);
        }

        report.finished_at = Some(chrono::Utc::now());
        self.transition(PipelineState::Finished);

        info!(
            "Pipeline finished: preview={}, glb={}, gaussian={}",
            report.preview_url.is_some(),
            report.glb_url.is_some(),
            report.gaussian_url.is_some()
        );

        Ok(report)
    }

    async fn run_extractions(
        &self,
        report: &mut PipelineReport,
        source: &JobHandle,
    ) -> Result<(), PipelineError> {
        let mut aborted = false;

        for asset in [AssetKind::Glb, AssetKind::GaussianPly] {
            let stage = Stage::from(asset);

            if aborted {
                info!("Skipping {} extraction after earlier failure", stage);
                report.record(stage, None, StageOutcome::Skipped);
                continue;
            }

            if !self.config.is_enabled(asset) {
                info!("{} extraction disabled", stage);
                report.record(stage, None, StageOutcome::Skipped);
                continue;
            }

            let outcome = self.run_extraction(report, asset, source).await?;
            if !outcome.is_success() && self.config.failure_policy == FailurePolicy::AbortOnFailure
            {
                aborted = true;
            }
        }

        Ok(())
    }

    async fn run_extraction(
        &self,
        report: &mut PipelineReport,
        asset: AssetKind,
        source: &JobHandle,
    ) -> Result<StageOutcome, PipelineError> {
        let stage = Stage::from(asset);
        let kind = asset.job_kind();

        let request = JobRequest::extraction(asset.extraction(), source.clone());
        let handle = submit(self.api.as_ref(), &request).await?;
        self.transition(PipelineState::submitted(stage));

        let status_handle = match self.config.status_handle {
            StatusHandle::Extraction => &handle,
            StatusHandle::Source => source,
        };

        self.transition(PipelineState::polling(stage));
        let result = self
            .poller
            .poll_until_terminal(self.api.as_ref(), kind, status_handle)
            .await?;

        let url = extract_asset(&result, asset).map(str::to_string);
        let outcome = match (&url, result.status) {
            (Some(url), _) => {
                info!("{} completed. URL: {}", kind, url);
                StageOutcome::Completed
            }
            (None, JobStatus::Failed) => StageOutcome::Failed,
            (None, _) => {
                warn!(
                    "{} completed without a .{} artifact",
                    kind,
                    asset.extension()
                );
                StageOutcome::NoArtifact
            }
        };

        if outcome.is_success() {
            self.transition(PipelineState::done(stage));
        } else {
            self.transition(PipelineState::StageFailed(stage));
        }

        report.record(stage, Some(handle), outcome);
        report.set_asset_url(asset, url);

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Artifact, JobResult};
    use crate::testing::MockJobApi;

    fn orchestrator(api: Arc<MockJobApi>) -> Orchestrator {
        let polling = PollingConfig {
            interval_ms: 1,
            max_attempts: 10,
        };
        Orchestrator::new(PipelineConfig::default(), polling, api)
    }

    #[tokio::test]
    async fn test_preview_only_when_extractions_disabled() {
        let api = Arc::new(MockJobApi::new());
        api.queue_submission(JobKind::ProcessImage, "A1").await;
        api.script_statuses(
            "A1",
            vec![JobResult::completed(vec![Artifact::new(
                "mp4",
                "http://x/preview.mp4",
            )])],
        )
        .await;

        let mut config = PipelineConfig::default();
        config.extract_glb = false;
        config.extract_gaussian = false;
        let orch = Orchestrator::new(
            config,
            PollingConfig {
                interval_ms: 1,
                max_attempts: 10,
            },
            api.clone(),
        );

        let report = orch
            .run(ImageUpload::new("chair.jpg", vec![0xff]))
            .await
            .unwrap();

        assert_eq!(report.preview_url.as_deref(), Some("http://x/preview.mp4"));
        assert_eq!(report.outcome(Stage::Glb), Some(StageOutcome::Skipped));
        assert_eq!(report.outcome(Stage::Gaussian), Some(StageOutcome::Skipped));
        assert_eq!(api.submissions().await.len(), 1);
        assert!(report.finished_at.is_some());
    }

    #[tokio::test]
    async fn test_completed_without_preview_skips_extractions() {
        let api = Arc::new(MockJobApi::new());
        api.queue_submission(JobKind::ProcessImage, "A1").await;
        api.script_statuses("A1", vec![JobResult::completed(vec![])])
            .await;

        let report = orchestrator(api.clone())
            .run(ImageUpload::new("chair.jpg", vec![0xff]))
            .await
            .unwrap();

        assert_eq!(report.outcome(Stage::Image), Some(StageOutcome::NoArtifact));
        assert_eq!(report.outcome(Stage::Glb), Some(StageOutcome::Skipped));
        assert_eq!(api.submissions().await.len(), 1);
    }
}
