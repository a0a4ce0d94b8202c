//! Turnstile HTTP transport
//!
//! Typed client for the authentication service: login, registration, token
//! refresh and the profile endpoint, plus a raw `send` used by the session
//! layer's request interceptor.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{ApiRequest, AuthServiceClient, AuthServiceClientBuilder};
pub use types::{AuthResponse, Credentials, RefreshRequest, TokenPayload, UserProfile};
