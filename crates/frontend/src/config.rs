//! Frontend configuration

use turnstile_core::DEFAULT_BASE_URL;

/// Application configuration
pub struct AppConfig;

impl AppConfig {
    /// Interval between session re-evaluations while signed in
    pub const SESSION_CHECK_INTERVAL_MS: u32 = 60_000; // 1 minute

    /// Base URL of the authentication service, fixed at build time through
    /// `TURNSTILE_API_URL`
    pub fn api_base_url() -> &'static str {
        option_env!("TURNSTILE_API_URL").unwrap_or(DEFAULT_BASE_URL)
    }
}
