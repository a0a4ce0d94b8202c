//! Turnstile CLI - session management against an authentication service

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use tracing::{Level, debug, error, info};

#[derive(Parser)]
#[command(name = "turnstile")]
#[command(about = "Manage a session with an authentication service")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (YAML or TOML)
    #[arg(short = 'c', long, global = true, env = "TURNSTILE_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the authentication service
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// File holding the stored session
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Request timeout in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    /// Also write logs to a file next to the session file
    #[arg(long, global = true)]
    file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::resolve(
        cli.config.as_deref(),
        config::Overrides {
            base_url: cli.base_url,
            state_file: cli.state_file,
            timeout_secs: cli.timeout,
        },
    )?;

    let log_file = cli.file_log.then(|| logging::log_file_path(&config));
    logging::init_logging(cli.log_level.into(), log_file)?;

    info!(base_url = %config.base_url, state_file = %config.state_file.display(), "Starting Turnstile CLI");

    match cli.command.execute(config).await {
        Ok(()) => {
            debug!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
