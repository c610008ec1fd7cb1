//! Types for the pipeline controller.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::api::{JobHandle, JobResult};
use crate::job::{AssetKind, PollError, SubmissionError};

/// Errors that abort a pipeline run.
///
/// A remote job that ends `FAILED` is not an error; it is recorded in the
/// [`PipelineReport`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Poll(#[from] PollError),
}

/// One stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Image,
    Glb,
    Gaussian,
}

impl From<AssetKind> for Stage {
    fn from(asset: AssetKind) -> Self {
        match asset {
            AssetKind::Glb => Stage::Glb,
            AssetKind::GaussianPly => Stage::Gaussian,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Image => "image",
            Stage::Glb => "glb",
            Stage::Gaussian => "gaussian",
        };
        f.write_str(name)
    }
}

/// Controller state.
///
/// ```text
/// NotStarted -> ImageSubmitted -> ImagePolling -> ImageDone
///   -> GlbSubmitted -> GlbPolling -> GlbDone
///   -> GaussianSubmitted -> GaussianPolling -> GaussianDone
///   -> Finished
/// ```
///
/// A polling stage that ends without its asset moves to `StageFailed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    NotStarted,
    ImageSubmitted,
    ImagePolling,
    ImageDone,
    GlbSubmitted,
    GlbPolling,
    GlbDone,
    GaussianSubmitted,
    GaussianPolling,
    GaussianDone,
    StageFailed(Stage),
    Finished,
}

impl PipelineState {
    pub fn submitted(stage: Stage) -> Self {
        match stage {
            Stage::Image => PipelineState::ImageSubmitted,
            Stage::Glb => PipelineState::GlbSubmitted,
            Stage::Gaussian => PipelineState::GaussianSubmitted,
        }
    }

    pub fn polling(stage: Stage) -> Self {
        match stage {
            Stage::Image => PipelineState::ImagePolling,
            Stage::Glb => PipelineState::GlbPolling,
            Stage::Gaussian => PipelineState::GaussianPolling,
        }
    }

    pub fn done(stage: Stage) -> Self {
        match stage {
            Stage::Image => PipelineState::ImageDone,
            Stage::Glb => PipelineState::GlbDone,
            Stage::Gaussian => PipelineState::GaussianDone,
        }
    }
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// The job completed and produced the expected asset.
    Completed,
    /// The remote job reported `FAILED`.
    Failed,
    /// The job completed but the expected asset was missing.
    NoArtifact,
    /// The stage was not attempted.
    Skipped,
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Completed)
    }
}

/// Outcome of a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    /// Job created for this stage, if one was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_uid: Option<JobHandle>,
    pub outcome: StageOutcome,
}

/// Result of one pipeline run. Partial results are normal: later URLs are
/// absent when their stages were skipped or failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Terminal result of the image-processing job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_result: Option<JobResult>,
    pub preview_url: Option<String>,
    pub glb_url: Option<String>,
    pub gaussian_url: Option<String>,
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            finished_at: None,
            image_result: None,
            preview_url: None,
            glb_url: None,
            gaussian_url: None,
            stages: Vec::new(),
        }
    }

    pub(crate) fn record(
        &mut self,
        stage: Stage,
        job_uid: Option<JobHandle>,
        outcome: StageOutcome,
    ) {
        self.stages.push(StageReport {
            stage,
            job_uid,
            outcome,
        });
    }

    pub(crate) fn set_asset_url(&mut self, asset: AssetKind, url: Option<String>) {
        match asset {
            AssetKind::Glb => self.glb_url = url,
            AssetKind::GaussianPly => self.gaussian_url = url,
        }
    }

    /// Outcome recorded for a stage.
    pub fn outcome(&self, stage: Stage) -> Option<StageOutcome> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.outcome)
    }

    /// Whether every stage produced its asset.
    pub fn is_complete(&self) -> bool {
        self.preview_url.is_some() && self.glb_url.is_some() && self.gaussian_url.is_some()
    }
}
