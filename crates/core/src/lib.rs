pub mod api;
pub mod config;
pub mod job;
pub mod pipeline;
pub mod testing;

pub use api::{
    Artifact, ExtractionKind, ImageUpload, JobApi, JobApiError, JobHandle, JobKind, JobResult,
    JobStatus, OpusClient,
};
pub use config::{
    load_config, load_config_from_str, validate_config, ApiConfig, Config, ConfigError,
    SanitizedConfig,
};
pub use job::{
    extract_asset, extract_by_extension, extract_first, submit, AssetKind, JobRequest, PollError,
    Poller, PollingConfig, SubmissionError,
};
pub use pipeline::{
    FailurePolicy, Orchestrator, PipelineConfig, PipelineError, PipelineReport, PipelineState,
    Stage, StageOutcome, StageReport, StateCallback, StatusHandle,
};
