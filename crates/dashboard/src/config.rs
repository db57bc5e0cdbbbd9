//! Dashboard client configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `CALLTRACK_*` environment variables.

use crate::feed::scroll::{CALL_LOG_SCROLL_THRESHOLD_PX, NOTIFICATION_SCROLL_THRESHOLD_PX};
use calltrack_core::validation::{require_http_url, require_positive};
use calltrack_core::{CoreResult, ValidateConfig};
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "CALLTRACK";

/// Main dashboard client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the dashboard REST API
    pub api_url: String,

    /// Base URL of the reference product/customer catalog
    pub catalog_url: String,

    /// Items requested per feed page
    pub page_limit: usize,

    /// Access tokens expiring within this many seconds are refreshed first
    pub refresh_leeway_secs: i64,

    /// Distance from the bottom of the document that loads the next call log page
    pub call_log_scroll_threshold_px: f64,

    /// Distance from the bottom of the document that loads the next notification page
    pub notification_scroll_threshold_px: f64,

    /// Fetch `/auth/me` when a protected route mounts
    pub fetch_profile: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Directory holding the persisted session and log files
    pub data_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            catalog_url: "https://dummyjson.com".to_string(),
            page_limit: 12,
            refresh_leeway_secs: 60,
            call_log_scroll_threshold_px: CALL_LOG_SCROLL_THRESHOLD_PX,
            notification_scroll_threshold_px: NOTIFICATION_SCROLL_THRESHOLD_PX,
            fetch_profile: true,
            timeout_secs: 30,
            data_dir: default_data_dir(),
        }
    }
}

/// `$CALLTRACK_STATE_DIR`, else the platform data directory
pub fn default_data_dir() -> PathBuf {
    std::env::var("CALLTRACK_STATE_DIR").map_or_else(
        |_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("calltrack")
        },
        PathBuf::from,
    )
}

impl DashboardConfig {
    /// Configuration pointing at `api_url` with every other value defaulted
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration with defaults, an optional file and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed, a value has the wrong
    /// type, or the result fails validation
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("catalog_url", defaults.catalog_url)?
            .set_default("page_limit", defaults.page_limit as u64)?
            .set_default("refresh_leeway_secs", defaults.refresh_leeway_secs)?
            .set_default(
                "call_log_scroll_threshold_px",
                defaults.call_log_scroll_threshold_px,
            )?
            .set_default(
                "notification_scroll_threshold_px",
                defaults.notification_scroll_threshold_px,
            )?
            .set_default("fetch_profile", defaults.fetch_profile)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_leeway(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_leeway_secs)
    }
}

impl ValidateConfig for DashboardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_http_url("api_url", &self.api_url)?;
        require_http_url("catalog_url", &self.catalog_url)?;
        require_positive("page_limit", self.page_limit as u64)?;
        require_positive("timeout_secs", self.timeout_secs)?;
        if self.refresh_leeway_secs < 0 {
            return Err(ConfigError::Message(
                "'refresh_leeway_secs' must not be negative".into(),
            ));
        }
        for (key, value) in [
            ("call_log_scroll_threshold_px", self.call_log_scroll_threshold_px),
            (
                "notification_scroll_threshold_px",
                self.notification_scroll_threshold_px,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "'{key}' must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}
