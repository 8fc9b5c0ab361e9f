use std::path::PathBuf;

use common::config::{ApiConfig, UploadConfig};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Where the session token is kept between runs.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Default: "<user config dir>/restart-creative/session.toml".
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("restart-creative")
        .join("session.toml")
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("RESTART_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., RESTART__API__BASE_URL)
            .add_source(Environment::with_prefix("RESTART").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
