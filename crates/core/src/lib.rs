//! Turnstile core: token storage, session types and client configuration

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::{ClientConfig, DEFAULT_BASE_URL, ENV_PREFIX};
pub use error::{ConfigError, StoreError, StoreResult};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
pub use store::{MemoryStore, StoreKey, TokenStore, clear_session, load_session};
pub use types::{StoredSession, TokenSet, is_expired, parse_expires_at};
