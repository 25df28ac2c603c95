//! Application configuration.
//!
//! Stored at `~/.config/pitchbook/config.json`. Environment variables
//! override the file: `PITCHBOOK_SOURCE`, `PITCHBOOK_API_URL` and
//! `PITCHBOOK_API_KEY`. The API key is only ever read from the environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::ParseEnumError;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "pitchbook";

const CONFIG_FILE: &str = "config.json";

pub const ENV_SOURCE: &str = "PITCHBOOK_SOURCE";
pub const ENV_API_URL: &str = "PITCHBOOK_API_URL";
pub const ENV_API_KEY: &str = "PITCHBOOK_API_KEY";

/// Where records are read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Built-in sample academy, kept in memory
    #[default]
    Fixture,
    /// Hosted PostgREST database
    Remote,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Fixture => "fixture",
            DataSource::Remote => "remote",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixture" => Ok(DataSource::Fixture),
            "remote" => Ok(DataSource::Remote),
            _ => Err(ParseEnumError::new("data source", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: DataSource,
    pub api_url: Option<String>,
    pub academy_name: Option<String>,
    /// Overrides the platform cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(path) = &self.cache_path {
            return Ok(path.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Apply overrides from a variable lookup, normally `std::env::var`.
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(source) = get(ENV_SOURCE) {
            self.source = source
                .parse()
                .with_context(|| format!("Invalid {}", ENV_SOURCE))?;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        Ok(())
    }

    pub fn academy_name(&self) -> &str {
        self.academy_name.as_deref().unwrap_or("Football Academy")
    }
}
