//! Client configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default address of the authentication service
pub const DEFAULT_BASE_URL: &str = "http://localhost:7000";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TURNSTILE";

/// Authentication client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the authentication service; requests under it carry the
    /// bearer token
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds (0 = no timeout, always the case in browsers)
    pub timeout_secs: u64,

    /// Where native clients persist the session
    pub state_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("turnstile/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 0,
            state_file: default_state_file(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file, overlaid with `TURNSTILE_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Optional request timeout
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_secs > 0).then(|| std::time::Duration::from_secs(self.timeout_secs))
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                message: format!("base_url must be an http(s) URL, got '{}'", self.base_url),
            });
        }
        Ok(self)
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let defaults = ClientConfig::default();
    Ok(builder
        .set_default("base_url", defaults.base_url)?
        .set_default("user_agent", defaults.user_agent)?
        .set_default("timeout_secs", defaults.timeout_secs)?
        .set_default(
            "state_file",
            defaults.state_file.to_string_lossy().to_string(),
        )?)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_state_file() -> PathBuf {
    directories::ProjectDirs::from("rs", "turnstile", "turnstile").map_or_else(
        || PathBuf::from(".turnstile").join("session.json"),
        |dirs| dirs.data_dir().join("session.json"),
    )
}

#[cfg(target_arch = "wasm32")]
fn default_state_file() -> PathBuf {
    PathBuf::from("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:7000");
        assert_eq!(config.timeout(), None);
        assert!(config.state_file.ends_with("session.json"));
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turnstile.toml");
        std::fs::write(
            &path,
            "base_url = \"https://auth.example.com/\"\ntimeout_secs = 10\n",
        )
        .unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.base_url, "https://auth.example.com");
        assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(10)));
        assert_eq!(config.user_agent, ClientConfig::default().user_agent);
    }

    #[test]
    fn test_from_file_rejects_non_http_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turnstile.yaml");
        std::fs::write(&path, "base_url: ftp://auth.example.com\n").unwrap();

        let result = ClientConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ClientConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
