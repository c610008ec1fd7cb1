use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API credentials are present
/// - Request timeout and poll interval are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.api_key cannot be empty".to_string(),
        ));
    }

    if config.api.api_host.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.api_host cannot be empty".to_string(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.polling.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "polling.interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}
