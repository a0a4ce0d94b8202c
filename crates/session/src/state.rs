//! Observable authentication state

use turnstile_http::UserProfile;

/// What the application currently believes about the user
///
/// Published through [`Session::subscribe`](crate::Session::subscribe);
/// `user` is only ever set while `authenticated` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
}

impl AuthState {
    /// Email of the signed-in user, when the profile has been loaded
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.email.as_str())
    }

    /// Apply an authentication result; returns whether anything changed
    pub(crate) fn set_authenticated(&mut self, authenticated: bool) -> bool {
        let changed = self.authenticated != authenticated || (!authenticated && self.user.is_some());
        self.authenticated = authenticated;
        if !authenticated {
            self.user = None;
        }
        changed
    }
}
