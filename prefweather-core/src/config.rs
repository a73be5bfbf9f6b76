use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{model::UnitSystem, prefecture::Prefecture};

/// Where and how to reach the MSN Weather connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Base URL of the connector API, without the connection id.
    pub base_url: String,
    pub connection_id: String,
    /// Sent as a bearer token when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_prefecture = "大阪府"
/// default_units = "Metric"
///
/// [connector]
/// base_url = "https://example.azure-apim.net/apim/msnweather"
/// connection_id = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub default_prefecture: Option<String>,
    pub default_units: Option<String>,
    pub connector: Option<ConnectorConfig>,
}

impl Config {
    /// Default prefecture, or Osaka when none is configured.
    pub fn default_prefecture(&self) -> Result<Prefecture> {
        match &self.default_prefecture {
            Some(name) => Prefecture::try_from(name.as_str()),
            None => Ok(Prefecture::default()),
        }
    }

    /// Default unit system, or metric when none is configured.
    pub fn default_units(&self) -> Result<UnitSystem> {
        match &self.default_units {
            Some(name) => UnitSystem::try_from(name.as_str()),
            None => Ok(UnitSystem::default()),
        }
    }

    pub fn set_default_prefecture(&mut self, prefecture: Prefecture) {
        self.default_prefecture = Some(prefecture.name().to_string());
    }

    pub fn set_default_units(&mut self, units: UnitSystem) {
        self.default_units = Some(units.as_str().to_string());
    }

    pub fn set_connector(&mut self, connector: ConnectorConfig) {
        self.connector = Some(connector);
    }

    pub fn connector_settings(&self) -> Result<&ConnectorConfig> {
        self.connector.as_ref().ok_or_else(|| {
            anyhow!(
                "No connector configured.\n\
                 Hint: run `prefweather configure` and enter the connector URL and connection id."
            )
        })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "prefweather", "prefweather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
