//! Session evaluation and the token lifecycle

use crate::error::SessionError;
use crate::interceptor::AuthorizedClient;
use crate::state::AuthState;
use chrono::Utc;
use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use turnstile_core::{StoreKey, TokenStore, clear_session, load_session};
use turnstile_http::{AuthResponse, AuthServiceClient, ClientError, Credentials, UserProfile};

type RefreshOutcome = Result<bool, SessionError>;
type SharedRefresh = Shared<LocalBoxFuture<'static, RefreshOutcome>>;

/// Handle on the client-side session
///
/// Cloning is cheap; clones share the store, the transport, the published
/// [`AuthState`] and the in-flight refresh.
pub struct Session<S> {
    inner: Rc<Inner<S>>,
}

struct Inner<S> {
    store: S,
    client: AuthServiceClient,
    state: watch::Sender<AuthState>,
    refresh: RefCell<Option<SharedRefresh>>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: TokenStore + 'static> Session<S> {
    /// Create a session over a store and a transport
    pub fn new(store: S, client: AuthServiceClient) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            inner: Rc::new(Inner {
                store,
                client,
                state,
                refresh: RefCell::new(None),
            }),
        }
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn client(&self) -> &AuthServiceClient {
        &self.inner.client
    }

    /// Whether both handles share the same session
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Subscribe to authentication state changes
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Last published authentication state
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Client that attaches the access token and recovers from a 401 once
    pub fn authorized_client(&self) -> AuthorizedClient<S> {
        AuthorizedClient::new(self.clone())
    }

    /// Whether the stored session is valid, refreshing it if expired
    ///
    /// A session missing any field is invalid without touching the network.
    /// An expired one is only as valid as the refresh makes it.
    pub async fn is_authenticated(&self) -> Result<bool, SessionError> {
        let stored = load_session(&self.inner.store)?;

        if !stored.is_complete() {
            debug!(empty = stored.is_empty(), "Stored session incomplete");
            return Ok(false);
        }

        if stored.is_expired_at(Utc::now()) == Some(true) {
            info!("Access token expired, refreshing");
            return self.refresh_access_token().await;
        }

        Ok(true)
    }

    /// The stored access token, if any
    pub fn access_token(&self) -> Option<String> {
        match self.inner.store.get(StoreKey::AccessToken) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!(error = %err, "Failed to read access token");
                None
            }
        }
    }

    /// Obtain a new token set using the stored refresh token
    ///
    /// Resolves `Ok(true)` once the new set is persisted and `Ok(false)` if
    /// the service answered without a complete set (the store is then left
    /// untouched). A missing refresh token or a failed refresh call clears the
    /// session before the error is returned.
    ///
    /// Concurrent callers share a single request and all observe its outcome.
    pub async fn refresh_access_token(&self) -> Result<bool, SessionError> {
        let refresh = {
            let mut slot = self.inner.refresh.borrow_mut();
            if let Some(in_flight) = slot.as_ref() {
                debug!("Joining in-flight token refresh");
                in_flight.clone()
            } else {
                let refresh = Self::refresh_once(Rc::downgrade(&self.inner))
                    .boxed_local()
                    .shared();
                *slot = Some(refresh.clone());
                refresh
            }
        };

        let outcome = refresh.clone().await;

        let mut slot = self.inner.refresh.borrow_mut();
        if slot
            .as_ref()
            .is_some_and(|current| current.ptr_eq(&refresh))
        {
            *slot = None;
        }

        outcome
    }

    /// One refresh round trip
    ///
    /// Holds the session only weakly across the request, so the in-flight
    /// future kept in `Inner::refresh` never keeps its own session alive.
    async fn refresh_once(inner: Weak<Inner<S>>) -> RefreshOutcome {
        let (client, refresh_token) = {
            let Some(session) = Self::upgrade(&inner) else {
                return Ok(false);
            };
            let refresh_token = session
                .inner
                .store
                .get(StoreKey::RefreshToken)?
                .filter(|token| !token.is_empty());

            let Some(refresh_token) = refresh_token else {
                warn!("No refresh token present, clearing session");
                session.logout();
                return Err(SessionError::NoRefreshToken);
            };
            (session.inner.client.clone(), refresh_token)
        };

        let result = client.refresh(&refresh_token).await;

        let Some(session) = Self::upgrade(&inner) else {
            debug!("Session dropped during token refresh");
            return Ok(false);
        };

        match result {
            Ok(response) => {
                let refreshed = session.apply_auth_response(&response)?;
                if refreshed {
                    info!("Access token refreshed");
                } else {
                    warn!(status = %response.status, "Refresh response carried no complete token set");
                }
                Ok(refreshed)
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, clearing session");
                session.logout();
                Err(err.into())
            }
        }
    }

    fn upgrade(inner: &Weak<Inner<S>>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// Log in and persist the issued tokens
    ///
    /// Returns `Ok(false)` when the service answered without a complete token
    /// set. A transport failure marks the session unauthenticated and is
    /// returned unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<bool, SessionError> {
        let result = self
            .inner
            .client
            .login(&Credentials::new(email, password))
            .await;
        self.complete_sign_in("login", result)
    }

    /// Register an account and persist the issued tokens
    ///
    /// Same outcomes as [`login`](Self::login).
    pub async fn register(&self, email: &str, password: &str) -> Result<bool, SessionError> {
        let result = self
            .inner
            .client
            .register(&Credentials::new(email, password))
            .await;
        self.complete_sign_in("register", result)
    }

    fn complete_sign_in(
        &self,
        action: &'static str,
        result: Result<AuthResponse, ClientError>,
    ) -> Result<bool, SessionError> {
        match result {
            Ok(response) => {
                let authenticated = self.apply_auth_response(&response)?;
                if authenticated {
                    info!(action, email = ?response.payload.email, "Signed in");
                } else {
                    warn!(action, status = %response.status, "Response carried no complete token set");
                }
                Ok(authenticated)
            }
            Err(err) => {
                warn!(action, error = %err, "Sign-in request failed");
                self.publish_authenticated(false);
                Err(err.into())
            }
        }
    }

    /// Persist a token set if the response carries a valid one
    fn apply_auth_response(&self, response: &AuthResponse) -> Result<bool, SessionError> {
        let authenticated = match response.token_set() {
            Some(tokens) => {
                tokens.persist(&self.inner.store)?;
                true
            }
            None => false,
        };
        self.publish_authenticated(authenticated);
        Ok(authenticated)
    }

    /// Re-evaluate the stored session and publish the result
    pub async fn update_authentication_state(&self) -> Result<bool, SessionError> {
        let result = self.is_authenticated().await;
        self.publish_authenticated(matches!(result, Ok(true)));
        result
    }

    /// Fetch the signed-in user's profile and publish it
    ///
    /// The service only answers `/user` for an accepted access token, so a
    /// loaded profile also publishes the session as authenticated.
    pub async fn load_profile(&self) -> Result<UserProfile, SessionError> {
        match self.authorized_client().fetch_profile().await {
            Ok(profile) => {
                let user = profile.clone();
                self.inner.state.send_modify(|state| {
                    state.set_authenticated(true);
                    state.user = Some(user);
                });
                Ok(profile)
            }
            Err(err) => {
                debug!(error = %err, "Failed to load profile");
                self.inner
                    .state
                    .send_if_modified(|state| state.user.take().is_some());
                Err(err)
            }
        }
    }

    /// Clear all stored session fields and publish the signed-out state
    pub fn logout(&self) {
        if let Err(err) = clear_session(&self.inner.store) {
            warn!(error = %err, "Session only partially cleared");
        }
        info!("Signed out");
        self.publish_authenticated(false);
    }

    fn publish_authenticated(&self, authenticated: bool) {
        self.inner
            .state
            .send_if_modified(|state| state.set_authenticated(authenticated));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnstile_core::MemoryStore;

    // Nothing listens here; any request fails fast
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn session(entries: &[(StoreKey, &'static str)]) -> Session<MemoryStore> {
        let store = MemoryStore::with_entries(entries.iter().copied());
        Session::new(store, AuthServiceClient::new(UNREACHABLE).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_are_not_authenticated() {
        let incomplete = [
            vec![],
            vec![(StoreKey::AccessToken, "abc")],
            vec![
                (StoreKey::AccessToken, "abc"),
                (StoreKey::ExpiresAt, "2999-01-01T00:00:00Z"),
            ],
            vec![
                (StoreKey::RefreshToken, "xyz"),
                (StoreKey::ExpiresAt, "2000-01-01T00:00:00Z"),
            ],
        ];

        for entries in incomplete {
            let session = session(&entries);
            assert!(!session.is_authenticated().await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_abandoned_refresh_does_not_keep_session_alive() {
        use std::time::Duration;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/refresh"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let store = MemoryStore::with_entries([
            (StoreKey::AccessToken, "abc"),
            (StoreKey::RefreshToken, "xyz"),
            (StoreKey::ExpiresAt, "2000-01-01T00:00:00Z"),
        ]);
        let session = Session::new(store, AuthServiceClient::new(mock_server.uri()).unwrap());
        let inner = Rc::downgrade(&session.inner);

        let pending =
            tokio::time::timeout(Duration::from_millis(100), session.refresh_access_token()).await;
        assert!(pending.is_err());
        assert!(session.inner.refresh.borrow().is_some());

        drop(session);
        assert!(inner.upgrade().is_none());
    }

    #[tokio::test]
    async fn test_unexpired_session_is_authenticated() {
        let session = session(&[
            (StoreKey::AccessToken, "abc"),
            (StoreKey::RefreshToken, "xyz"),
            (StoreKey::ExpiresAt, "2999-01-01T00:00:00Z"),
        ]);
        assert!(session.is_authenticated().await.unwrap());
        assert_eq!(session.access_token().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_access_token_absent() {
        let session = session(&[(StoreKey::AccessToken, "")]);
        assert_eq!(session.access_token(), None);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let session = session(&[
            (StoreKey::AccessToken, "abc"),
            (StoreKey::ExpiresAt, "2999-01-01T00:00:00Z"),
        ]);
        let mut changes = session.subscribe();
        session.publish_authenticated(true);
        assert!(changes.has_changed().unwrap());
        changes.mark_unchanged();

        session.logout();
        assert!(session.store().is_empty());
        assert!(changes.has_changed().unwrap());
        assert!(!session.state().authenticated);

        // Logging out twice is harmless
        session.logout();
        assert!(session.store().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_without_token_logs_out() {
        let session = session(&[
            (StoreKey::AccessToken, "abc"),
            (StoreKey::ExpiresAt, "2000-01-01T00:00:00Z"),
        ]);

        let result = session.refresh_access_token().await;
        assert!(matches!(result, Err(SessionError::NoRefreshToken)));
        assert!(session.store().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_during_refresh_logs_out() {
        let session = session(&[
            (StoreKey::AccessToken, "abc"),
            (StoreKey::RefreshToken, "xyz"),
            (StoreKey::ExpiresAt, "2000-01-01T00:00:00Z"),
        ]);

        let result = session.is_authenticated().await;
        let err = result.unwrap_err();
        assert!(matches!(
            err.transport(),
            Some(ClientError::Request(_))
        ));
        assert!(session.store().is_empty());
        assert!(session.inner.refresh.borrow().is_none());
    }
}
