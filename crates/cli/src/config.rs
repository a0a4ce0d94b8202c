//! CLI configuration utilities

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use turnstile_core::ClientConfig;

/// Values given on the command line, applied over the loaded configuration
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub state_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// Load configuration from `path` (or the environment alone) and apply overrides
pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ClientConfig::from_env().context("Failed to load configuration")?,
    };

    if let Some(base_url) = overrides.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(state_file) = overrides.state_file {
        config.state_file = state_file;
    }
    if let Some(timeout_secs) = overrides.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use turnstile_core::DEFAULT_BASE_URL;

    #[test]
    fn test_file_then_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"https://auth.example.com/\"").unwrap();
        writeln!(file, "timeout_secs = 30").unwrap();

        let config = resolve(Some(file.path()), Overrides::default()).unwrap();
        assert_eq!(config.base_url, "https://auth.example.com");
        assert_eq!(config.timeout_secs, 30);

        let config = resolve(
            Some(file.path()),
            Overrides {
                base_url: Some("http://127.0.0.1:7000/".into()),
                state_file: Some(PathBuf::from("/tmp/session.json")),
                timeout_secs: Some(0),
            },
        )
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:7000");
        assert_eq!(config.state_file, PathBuf::from("/tmp/session.json"));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, Overrides::default()).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = resolve(Some(Path::new("/nonexistent/turnstile.toml")), Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/turnstile.toml"));
    }
}
