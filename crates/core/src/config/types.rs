use serde::{Deserialize, Serialize};

use crate::job::PollingConfig;
use crate::pipeline::PipelineConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Remote API credentials and transport settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API key sent as `x-rapidapi-key`
    pub api_key: String,
    /// API host sent as `x-rapidapi-host` (e.g., "opus-gen02.p.rapidapi.com")
    pub api_host: String,
    /// Base URL override (default: `https://{api_host}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Base URL without trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.api_host),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: SanitizedApiConfig,
    pub polling: PollingConfig,
    pub pipeline: PipelineConfig,
}

/// Sanitized API config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub api_host: String,
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: SanitizedApiConfig {
                api_host: config.api.api_host.clone(),
                base_url: config.api.base_url(),
                api_key_configured: !config.api.api_key.is_empty(),
                timeout_secs: config.api.timeout_secs,
            },
            polling: config.polling.clone(),
            pipeline: config.pipeline.clone(),
        }
    }
}
