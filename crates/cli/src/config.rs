//! CLI configuration loading

use anyhow::{Context, Result};
use calltrack_dashboard::DashboardConfig;
use std::path::{Path, PathBuf};

/// Load the dashboard configuration; `--data-dir` wins over every other source
pub fn load(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(path).with_context(|| match path {
        Some(path) => format!("loading configuration from {}", path.display()),
        None => "loading configuration (set CALLTRACK_API_URL or pass --config)".to_string(),
    })?;

    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    Ok(config)
}
