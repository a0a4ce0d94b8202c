//! Authentication endpoints

use super::{ApiRequest, AuthServiceClient, error::ClientError};
use crate::types::{AuthResponse, Credentials, RefreshRequest, TokenPayload, UserProfile};
use reqwest::{Method, RequestBuilder};

/// Path of the profile endpoint
pub const PROFILE_PATH: &str = "/user";

impl AuthServiceClient {
    /// Log in with email and password
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let request = self.request(Method::POST, "/login").json(credentials);
        self.issue_tokens(request).await
    }

    /// Register a new account
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let request = self.request(Method::POST, "/register").json(credentials);
        self.issue_tokens(request).await
    }

    /// Exchange a refresh token for a new token set
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ClientError> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let request = self.request(Method::POST, "/refresh").json(&body);
        self.issue_tokens(request).await
    }

    /// Request describing a profile fetch
    pub fn profile_request(&self) -> ApiRequest {
        ApiRequest::get(self.url(PROFILE_PATH))
    }

    /// Fetch the profile of the account owning `bearer`
    pub async fn fetch_profile(&self, bearer: Option<&str>) -> Result<UserProfile, ClientError> {
        let response = self.send(&self.profile_request(), bearer).await?;
        Self::decode(response).await
    }

    async fn issue_tokens(&self, request: RequestBuilder) -> Result<AuthResponse, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(ClientError::from_status(status, message));
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<TokenPayload>(&body).unwrap_or_else(|err| {
            debug!(%status, error = %err, "Token response body is not a token payload");
            TokenPayload::default()
        });

        Ok(AuthResponse { status, payload })
    }
}
