//! Image-to-3D pipeline controller.
//!
//! The controller drives one image through the remote service:
//! - **Image**: upload, poll until processed, take the preview URL
//! - **GLB**: request mesh extraction, poll, take the `.glb` URL
//! - **Gaussian**: request splat extraction, poll, take the `.ply` URL
//!
//! Extractions only start once the image stage produced a preview.

mod config;
mod runner;
mod types;

pub use config::{FailurePolicy, PipelineConfig, StatusHandle};
pub use runner::{Orchestrator, StateCallback};
pub use types::{
    PipelineError, PipelineReport, PipelineState, Stage, StageOutcome, StageReport,
};
