use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{dashboard::DashboardOptions, provider::open_meteo::FORECAST_URL, view::ViewMode};

/// Top-level configuration stored on disk. Every key is optional.
///
/// Example TOML:
/// ```toml
/// api_url = "https://api.open-meteo.com/v1/forecast"
/// default_view = "tree"
/// auto_refresh = true
/// refresh_interval_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forecast endpoint; the public Open-Meteo API unless overridden.
    pub api_url: String,
    pub default_view: ViewMode,
    pub auto_refresh: bool,
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: FORECAST_URL.to_string(),
            default_view: ViewMode::Grid,
            auto_refresh: true,
            refresh_interval_secs: 30,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.refresh_interval_secs >= 1, "refresh_interval_secs must be at least 1");
        ensure!(!self.api_url.trim().is_empty(), "api_url must not be empty");
        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "envmon", "envmon")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            view_mode: self.default_view,
            auto_refresh: self.auto_refresh,
            refresh_interval: self.refresh_interval(),
        }
    }
}
