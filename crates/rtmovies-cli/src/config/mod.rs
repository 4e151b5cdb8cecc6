//! Application configuration module.
//!
//! Manages the TOML config file holding the API key and
//! connection settings for the Rotten Tomatoes API.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, ApiConfig, AppConfig};
pub use paths::resolve_config_path;
