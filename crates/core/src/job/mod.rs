//! Single-job building blocks: submit a job, poll it to a terminal status,
//! and pull asset URLs out of the result.

mod config;
mod error;
mod extract;
mod poller;
mod submitter;

pub use config::PollingConfig;
pub use error::{PollError, SubmissionError};
pub use extract::{extract_asset, extract_by_extension, extract_first, AssetKind};
pub use poller::Poller;
pub use submitter::{submit, JobRequest};
