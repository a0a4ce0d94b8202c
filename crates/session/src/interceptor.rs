//! Authorization for outgoing requests
//!
//! Requests under the service base URL get the current access token as a
//! bearer credential. A 401 answer triggers one token refresh and, if that
//! succeeds, exactly one retry with the new token.

use crate::error::SessionError;
use crate::session::Session;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use turnstile_core::TokenStore;
use turnstile_http::{ApiRequest, AuthServiceClient, ClientError, UserProfile};

/// Request sender bound to a session
pub struct AuthorizedClient<S> {
    session: Session<S>,
}

impl<S> Clone for AuthorizedClient<S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
        }
    }
}

impl<S: TokenStore + 'static> AuthorizedClient<S> {
    pub fn new(session: Session<S>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Absolute URL for a path on the authentication service
    pub fn url(&self, path: &str) -> String {
        self.session.client().url(path)
    }

    /// Send a request, recovering once from an expired access token
    ///
    /// Responses are returned whatever their status, including a second 401
    /// after the retry. Fails with [`SessionError::Unauthorized`] when the
    /// refresh yields no valid session, or with the refresh error itself.
    /// Requests to other origins are sent untouched and never retried.
    pub async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, SessionError> {
        let client = self.session.client();

        if !client.targets(&request.url) {
            return Ok(client.send(request, None).await?);
        }

        let response = self.send_with_token(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        info!(method = %request.method, url = %request.url, "Request unauthorized, refreshing access token");
        if !self.session.refresh_access_token().await? {
            return Err(SessionError::Unauthorized);
        }

        debug!(url = %request.url, "Retrying request with refreshed access token");
        Ok(self.send_with_token(request).await?)
    }

    /// Send a request and decode a successful JSON response
    ///
    /// Error statuses surface as [`SessionError::Transport`].
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, SessionError> {
        let response = self.send(request).await?;
        Ok(AuthServiceClient::decode(response).await?)
    }

    /// Fetch the signed-in user's profile
    pub async fn fetch_profile(&self) -> Result<UserProfile, SessionError> {
        let request = self.session.client().profile_request();
        self.execute(&request).await
    }

    async fn send_with_token(&self, request: &ApiRequest) -> Result<reqwest::Response, ClientError> {
        let token = self.session.access_token();
        self.session.client().send(request, token.as_deref()).await
    }
}
