//! CLI commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use tracing::info;
use turnstile_core::{ClientConfig, FileStore, load_session};
use turnstile_http::AuthServiceClient;
use turnstile_session::Session;

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "TURNSTILE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "TURNSTILE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show whether the stored session is valid, refreshing it if expired
    Status,

    /// Exchange the refresh token for a new token set
    Refresh,

    /// Fetch the signed-in user's profile
    Profile,

    /// Forget the stored session
    Logout,

    /// Configuration operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as JSON
    Show,
}

impl Commands {
    pub async fn execute(self, config: ClientConfig) -> Result<()> {
        match self {
            Self::Login { email, password } => {
                login(&open_session(&config)?, &email, &password).await
            }
            Self::Register { email, password } => {
                register(&open_session(&config)?, &email, &password).await
            }
            Self::Status => status(&open_session(&config)?).await,
            Self::Refresh => refresh(&open_session(&config)?).await,
            Self::Profile => profile(&open_session(&config)?).await,
            Self::Logout => {
                open_session(&config)?.logout();
                println!("Signed out");
                Ok(())
            }
            Self::Config { command } => command.execute(&config),
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, config: &ClientConfig) -> Result<()> {
        match self {
            Self::Show => {
                println!("{}", serde_json::to_string_pretty(config)?);
                Ok(())
            }
        }
    }
}

fn open_session(config: &ClientConfig) -> Result<Session<FileStore>> {
    let client = AuthServiceClient::from_config(config)
        .context("Failed to create authentication client")?;
    let store = FileStore::new(&config.state_file);
    Ok(Session::new(store, client))
}

async fn login(session: &Session<FileStore>, email: &str, password: &str) -> Result<()> {
    info!(email, "Signing in");
    if !session.login(email, password).await.context("Login failed")? {
        bail!("Login failed: the service returned no usable tokens");
    }
    println!("Signed in as {email}");
    Ok(())
}

async fn register(session: &Session<FileStore>, email: &str, password: &str) -> Result<()> {
    info!(email, "Registering");
    if !session
        .register(email, password)
        .await
        .context("Registration failed")?
    {
        bail!("Registration failed: the service returned no usable tokens");
    }
    println!("Registered and signed in as {email}");
    Ok(())
}

async fn status(session: &Session<FileStore>) -> Result<()> {
    let authenticated = session
        .is_authenticated()
        .await
        .context("Session check failed")?;

    if authenticated {
        let stored = load_session(session.store())?;
        println!(
            "Signed in (access token expires {})",
            stored.expires_at.as_deref().unwrap_or("unknown")
        );
    } else {
        println!("Not signed in");
    }
    Ok(())
}

async fn refresh(session: &Session<FileStore>) -> Result<()> {
    if !session
        .refresh_access_token()
        .await
        .context("Token refresh failed")?
    {
        bail!("Token refresh failed: the service returned no usable tokens");
    }
    println!("Session refreshed");
    Ok(())
}

async fn profile(session: &Session<FileStore>) -> Result<()> {
    if !session
        .is_authenticated()
        .await
        .context("Session check failed")?
    {
        bail!("Not signed in");
    }

    let profile = session
        .load_profile()
        .await
        .context("Failed to fetch profile")?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
