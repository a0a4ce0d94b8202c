use anyhow::Result;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use turnstile_core::ClientConfig;

const LOG_FILE_NAME: &str = "turnstile.log";

/// Initialize logging for the CLI
///
/// Logs always go to stderr; with `log_file` they are also written, without
/// colors, to that file. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: Level, log_file: Option<PathBuf>) -> Result<()> {
    let env_filter = env_filter(level);

    if let Some(log_file_path) = log_file {
        if let Some(parent) = log_file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(log_file)
                    .with_ansi(false),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

/// Log file kept alongside the session file
pub fn log_file_path(config: &ClientConfig) -> PathBuf {
    config.state_file.with_file_name(LOG_FILE_NAME)
}

fn env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "turnstile={level_str},turnstile_core={level_str},turnstile_http={level_str},turnstile_session={level_str}"
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_sits_next_to_session() {
        let config = ClientConfig {
            state_file: PathBuf::from("/var/lib/turnstile/session.json"),
            ..ClientConfig::default()
        };
        assert_eq!(
            log_file_path(&config),
            PathBuf::from("/var/lib/turnstile/turnstile.log")
        );
    }
}
