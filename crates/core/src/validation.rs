//! Configuration validation support

use config::ConfigError;
use serde::{Deserialize, Serialize};

/// Trait for validating configuration values
pub trait ValidateConfig: Serialize + for<'de> Deserialize<'de> {
    /// Validate the configuration
    ///
    /// Returns Ok(()) if valid, or an error describing what's wrong
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Require a non-empty string value at `key`
pub fn require_non_empty(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Message(format!("'{key}' must not be empty")));
    }
    Ok(())
}

/// Require a strictly positive value at `key`
pub fn require_positive(key: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Message(format!(
            "'{key}' must be greater than zero"
        )));
    }
    Ok(())
}

/// Require an absolute http(s) URL at `key`
pub fn require_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    require_non_empty(key, value)?;
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::Message(format!("'{key}' is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Message(format!(
            "'{key}' must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("api_url", "http://x").is_ok());
        assert!(require_non_empty("api_url", "   ").is_err());
    }

    #[test]
    fn test_require_http_url() {
        assert!(require_http_url("api_url", "https://api.example.com").is_ok());
        let err = require_http_url("api_url", "ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("page_limit", 12).is_ok());
        assert!(require_positive("page_limit", 0).is_err());
    }
}
