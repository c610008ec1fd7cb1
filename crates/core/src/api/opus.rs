//! HTTP client for the Opus image-to-3D API (RapidAPI gateway).
//!
//! Every request carries the `x-rapidapi-key` and `x-rapidapi-host`
//! credential headers taken from [`ApiConfig`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;

use super::types::{ImageUpload, JobHandle, JobResult};
use super::{ExtractionKind, JobApi, JobApiError};

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";

/// Multipart field the service expects the image under.
const IMAGE_FIELD: &str = "file1";

/// Opus API client.
pub struct OpusClient {
    client: Client,
    base_url: String,
    api_key: String,
    api_host: String,
}

impl OpusClient {
    /// Create a new client from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, JobApiError> {
        if config.api_key.is_empty() {
            return Err(JobApiError::NotConfigured(
                "API key is required".to_string(),
            ));
        }
        if config.api_host.is_empty() {
            return Err(JobApiError::NotConfigured(
                "API host is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }

    fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(KEY_HEADER, &self.api_key)
            .header(HOST_HEADER, &self.api_host)
    }

    /// Turn a non-success response into an `ApiError`.
    async fn check_status(response: Response) -> Result<Response, JobApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobApiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }

    async fn parse_job_uid(response: Response) -> Result<JobHandle, JobApiError> {
        let response = Self::check_status(response).await?;
        let body: SubmitResponse = response.json().await.map_err(|e| {
            JobApiError::ParseError(format!("Failed to parse submission response: {}", e))
        })?;

        match body.job_uid {
            Some(uid) if !uid.is_empty() => Ok(JobHandle::new(uid)),
            _ => Err(JobApiError::MissingJobUid),
        }
    }
}

#[async_trait]
impl JobApi for OpusClient {
    async fn process_image(&self, image: &ImageUpload) -> Result<JobHandle, JobApiError> {
        let url = format!("{}/process-image", self.base_url);

        debug!(
            "Uploading image: file='{}', bytes={}",
            image.file_name,
            image.bytes.len()
        );

        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);

        let response = self
            .with_credentials(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_job_uid(response).await
    }

    async fn request_extraction(
        &self,
        kind: ExtractionKind,
        source: &JobHandle,
    ) -> Result<JobHandle, JobApiError> {
        let endpoint = match kind {
            ExtractionKind::Glb => "extract-glb",
            ExtractionKind::Gaussian => "extract-gaussian",
        };
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!("Requesting {}: source job_uid={}", kind.job_kind(), source);

        let response = self
            .with_credentials(self.client.post(&url))
            .query(&[("job_uid", source.as_str())])
            .json(&serde_json::json!({}))
            .send()
            .await?;

        Self::parse_job_uid(response).await
    }

    async fn job_result(&self, handle: &JobHandle) -> Result<JobResult, JobApiError> {
        let url = format!("{}/job_result/{}", self.base_url, handle);

        let response = self
            .with_credentials(self.client.get(&url))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        response.json().await.map_err(|e| {
            JobApiError::ParseError(format!("Failed to parse job result: {}", e))
        })
    }
}

// ============================================================================
// API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    job_uid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config() -> ApiConfig {
        ApiConfig {
            api_key: "key".to_string(),
            api_host: "opus.example.com".to_string(),
            base_url: None,
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = ApiConfig {
            api_key: String::new(),
            ..api_config()
        };
        let result = OpusClient::new(&config);
        assert!(matches!(result, Err(JobApiError::NotConfigured(_))));
    }

    #[test]
    fn test_new_requires_api_host() {
        let config = ApiConfig {
            api_host: String::new(),
            ..api_config()
        };
        let result = OpusClient::new(&config);
        assert!(matches!(result, Err(JobApiError::NotConfigured(_))));
    }

    #[test]
    fn test_base_url_defaults_to_host() {
        let client = OpusClient::new(&api_config()).unwrap();
        assert_eq!(client.base_url, "https://opus.example.com");
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let config = ApiConfig {
            base_url: Some("http://127.0.0.1:9000/".to_string()),
            ..api_config()
        };
        let client = OpusClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_submit_response_without_uid() {
        let body: SubmitResponse = serde_json::from_str(r#"{"message":"queued"}"#).unwrap();
        assert!(body.job_uid.is_none());
    }
}
