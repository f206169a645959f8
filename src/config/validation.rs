use crate::config::types::{ApiConfig, Config, PollingConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_polling_config(&config.polling)?;
    Ok(())
}

/// Validates API connection settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_path)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_path: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_path '{}' must use http or https",
            config.base_path
        )));
    }

    validate_api_version(&config.api_version)?;

    Ok(())
}

/// API versions look like "v1", "v2", ...
fn validate_api_version(version: &str) -> Result<(), ConfigError> {
    let valid = version
        .strip_prefix('v')
        .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);

    if !valid {
        return Err(ConfigError::Validation(format!(
            "api_version must look like 'v1', got '{}'",
            version
        )));
    }

    Ok(())
}

/// Validates polling configuration
fn validate_polling_config(config: &PollingConfig) -> Result<(), ConfigError> {
    if config.max_polling_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_polling_retries must be >= 1, got {}",
            config.max_polling_retries
        )));
    }

    Ok(())
}
