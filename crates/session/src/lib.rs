//! Turnstile session layer
//!
//! Decides whether the stored session is valid, refreshes expired access
//! tokens, retries unauthorized requests once after a refresh, and gates
//! protected routes.
//!
//! Everything here is single-threaded: handles are `Rc`-based and futures are
//! `!Send`, matching the browser's event loop (or a `current_thread` runtime).

pub mod error;
pub mod guard;
pub mod interceptor;
pub mod session;
pub mod state;

pub use error::SessionError;
pub use guard::{Navigation, Protected, RouteGuard};
pub use interceptor::AuthorizedClient;
pub use session::Session;
pub use state::AuthState;
