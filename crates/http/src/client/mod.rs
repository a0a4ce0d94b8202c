//! Authentication service client

pub mod auth;
pub mod error;
pub mod request;

pub use request::ApiRequest;

use error::ClientError;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;
use turnstile_core::ClientConfig;
use url::Url;

/// Client for the authentication service
///
/// Holds no credentials itself; callers pass the bearer token per request.
#[derive(Clone)]
pub struct AuthServiceClient {
    client: Client,
    base_url: String,
    base: Url,
}

impl AuthServiceClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Self::builder()
            .base_url(&config.base_url)
            .user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Create a new client builder
    pub fn builder() -> AuthServiceClientBuilder {
        AuthServiceClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a service path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Whether a URL points at the authentication service
    ///
    /// Scheme, host and port must match the base URL, and the path must sit
    /// at or below the base path.
    pub fn targets(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else {
            return false;
        };
        if url.scheme() != self.base.scheme()
            || url.host() != self.base.host()
            || url.port_or_known_default() != self.base.port_or_known_default()
        {
            return false;
        }

        let base_path = self.base.path().trim_end_matches('/');
        base_path.is_empty()
            || url.path() == base_path
            || url
                .path()
                .strip_prefix(base_path)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Create a request builder for a service path
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request as-is, optionally with a bearer token
    ///
    /// Any HTTP status is returned as a response; only network failures are
    /// errors.
    pub async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());

        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %request.url, authorized = bearer.is_some(), "Sending request");
        Ok(builder.send().await?)
    }

    /// Decode a response, mapping error statuses to [`ClientError`]
    pub async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for AuthServiceClient
#[derive(Default)]
pub struct AuthServiceClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl AuthServiceClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout (ignored in browsers)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<AuthServiceClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url '{base_url}': {e}")))?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("turnstile/", env!("CARGO_PKG_VERSION")).to_string());

        #[cfg(not(target_arch = "wasm32"))]
        let client = {
            let mut builder = ClientBuilder::new().user_agent(user_agent);
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            builder.build()?
        };

        #[cfg(target_arch = "wasm32")]
        let client = {
            let _ = self.timeout; // Timeouts not supported on WASM
            ClientBuilder::new().user_agent(user_agent).build()?
        };

        Ok(AuthServiceClient {
            client,
            base_url,
            base,
        })
    }
}
