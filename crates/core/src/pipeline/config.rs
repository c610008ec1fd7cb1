//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::job::AssetKind;

/// What to do with the remaining extractions when one of them fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Attempt every extraction regardless of earlier extraction outcomes.
    #[default]
    ContinueOnFailure,
    /// Skip remaining extractions after the first one that fails.
    AbortOnFailure,
}

/// Which job handle to poll for an extraction's status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusHandle {
    /// The handle returned by the extraction submission.
    #[default]
    Extraction,
    /// The handle of the source image-processing job.
    Source,
}

/// Configuration for the pipeline controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    #[serde(default)]
    pub status_handle: StatusHandle,

    /// Request a GLB mesh once the image is processed.
    #[serde(default = "default_true")]
    pub extract_glb: bool,

    /// Request a Gaussian splat PLY once the image is processed.
    #[serde(default = "default_true")]
    pub extract_gaussian: bool,
}

fn default_true() -> bool {
    true
}

impl PipelineConfig {
    pub fn is_enabled(&self, asset: AssetKind) -> bool {
        match asset {
            AssetKind::Glb => self.extract_glb,
            AssetKind::GaussianPly => self.extract_gaussian,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            status_handle: StatusHandle::default(),
            extract_glb: true,
            extract_gaussian: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.failure_policy, FailurePolicy::ContinueOnFailure);
        assert_eq!(config.status_handle, StatusHandle::Extraction);
        assert!(config.is_enabled(AssetKind::Glb));
        assert!(config.is_enabled(AssetKind::GaussianPly));
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            extract_glb = false
        "#;
        let config: PipelineConfig = toml::from_str(toml).unwrap();
        assert!(!config.is_enabled(AssetKind::Glb));
        assert!(config.is_enabled(AssetKind::GaussianPly));
        assert_eq!(config.failure_policy, FailurePolicy::ContinueOnFailure);
    }

    #[test]
    fn test_deserialize_policies() {
        let toml = r#"
            failure_policy = "abort_on_failure"
            status_handle = "source"
        "#;
        let config: PipelineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::AbortOnFailure);
        assert_eq!(config.status_handle, StatusHandle::Source);
    }
}
