//! Client-side route protection

use crate::session::Session;
use tracing::{debug, warn};
use turnstile_core::TokenStore;

/// Routes that may require an authenticated session
pub trait Protected {
    fn is_protected(&self) -> bool;
}

/// Outcome of a navigation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<R> {
    Allow,
    Redirect(R),
}

/// Decides whether a navigation may proceed
pub struct RouteGuard<S, R> {
    session: Session<S>,
    login: R,
}

impl<S, R: Clone> Clone for RouteGuard<S, R> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            login: self.login.clone(),
        }
    }
}

impl<S: TokenStore + 'static, R: Protected + Clone> RouteGuard<S, R> {
    /// Create a guard that sends unauthenticated visitors to `login`
    pub fn new(session: Session<S>, login: R) -> Self {
        Self { session, login }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Check a navigation target
    ///
    /// Unprotected targets are always allowed. Protected ones are allowed
    /// only for an authenticated session; a failed check (for example a
    /// refresh error) redirects just like a negative one.
    pub async fn check(&self, target: &R) -> Navigation<R> {
        if !target.is_protected() {
            return Navigation::Allow;
        }

        match self.session.is_authenticated().await {
            Ok(true) => Navigation::Allow,
            Ok(false) => {
                debug!("Not authenticated, redirecting to login");
                Navigation::Redirect(self.login.clone())
            }
            Err(err) => {
                warn!(error = %err, "Authentication check failed, redirecting to login");
                Navigation::Redirect(self.login.clone())
            }
        }
    }
}
