//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "RT_API_KEY";

/// Country used by list commands when neither `--country` nor `api.country` is set.
const DEFAULT_COUNTRY: &str = "us";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Rotten Tomatoes API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Rotten Tomatoes API configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// API key (overridden by `RT_API_KEY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Default country code for list commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

impl ApiConfig {
    /// Resolves the API key, preferring `env_key` (from `RT_API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a non-empty key.
    pub fn resolve_api_key(&self, env_key: Option<String>) -> Result<String> {
        env_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
            .with_context(|| {
                format!("{API_KEY_ENV} environment variable or api.api_key in config.toml is required")
            })
    }

    /// Parses the configured base URL, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is set but not a valid URL.
    pub fn parsed_base_url(&self) -> Result<Option<Url>> {
        let Some(raw) = self.base_url.as_deref() else {
            return Ok(None);
        };
        let url = Url::parse(raw).with_context(|| format!("invalid api.base_url: {raw}"))?;
        Ok(Some(url))
    }

    /// Returns the configured timeout, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout_secs` is zero.
    pub fn timeout(&self) -> Result<Option<Duration>> {
        match self.timeout_secs {
            None => Ok(None),
            Some(0) => bail!("api.timeout_secs must be greater than zero"),
            Some(secs) => Ok(Some(Duration::from_secs(secs))),
        }
    }

    /// Resolves the country code: CLI argument, then config, then `us`.
    #[must_use]
    pub fn resolve_country(&self, arg: Option<&str>) -> String {
        arg.or(self.country.as_deref())
            .map_or_else(|| String::from(DEFAULT_COUNTRY), String::from)
    }
}
