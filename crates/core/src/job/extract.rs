//! Locating asset URLs in a completed job result.
//!
//! Two lookups exist on purpose: [`extract_first`] is the unfiltered preview
//! lookup used after image processing, [`extract_by_extension`] is the typed
//! lookup used for derived assets.

use crate::api::{ExtractionKind, JobKind, JobResult, JobStatus};

/// A derived asset the pipeline can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Glb,
    GaussianPly,
}

impl AssetKind {
    /// Extension tag the API uses for this asset.
    pub fn extension(&self) -> &'static str {
        match self {
            AssetKind::Glb => "glb",
            AssetKind::GaussianPly => "ply",
        }
    }

    /// The extraction request that produces this asset.
    pub fn extraction(&self) -> ExtractionKind {
        match self {
            AssetKind::Glb => ExtractionKind::Glb,
            AssetKind::GaussianPly => ExtractionKind::Gaussian,
        }
    }

    pub fn job_kind(&self) -> JobKind {
        self.extraction().job_kind()
    }
}

/// URL of the first artifact whose extension matches exactly.
///
/// Returns `None` unless the job completed. Artifacts with an empty URL are
/// skipped.
pub fn extract_by_extension<'a>(result: &'a JobResult, extension: &str) -> Option<&'a str> {
    if result.status != JobStatus::Completed {
        return None;
    }

    result
        .urls
        .iter()
        .find(|a| a.extension == extension && !a.url.is_empty())
        .map(|a| a.url.as_str())
}

/// URL of a derived asset.
pub fn extract_asset(result: &JobResult, asset: AssetKind) -> Option<&str> {
    extract_by_extension(result, asset.extension())
}

/// URL of the first artifact regardless of its extension (the preview).
///
/// Returns `None` unless the job completed with a non-empty first URL.
pub fn extract_first(result: &JobResult) -> Option<&str> {
    if result.status != JobStatus::Completed {
        return None;
    }

    result
        .urls
        .first()
        .map(|a| a.url.as_str())
        .filter(|url| !url.is_empty())
}
