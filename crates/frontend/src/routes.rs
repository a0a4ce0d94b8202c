//! Client-side routes

use crate::guard::RequireAuth;
use crate::views::{About, Home, Login, NotFound, Profile, Register};
use turnstile_session::Protected;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Routable)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/register")]
    Register,
    #[at("/login")]
    Login,
    #[at("/profile")]
    Profile,
    #[at("/about")]
    About,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Where to go once login or registration succeeds
    pub const AFTER_SIGN_IN: Self = Self::Home;
    /// Where to go after signing out
    pub const AFTER_SIGN_OUT: Self = Self::Login;
}

impl Protected for Route {
    fn is_protected(&self) -> bool {
        matches!(self, Self::Profile)
    }
}

pub fn switch(route: Route) -> Html {
    let view = match route {
        Route::Home => html! { <Home /> },
        Route::Register => html! { <Register /> },
        Route::Login => html! { <Login /> },
        Route::Profile => html! { <Profile /> },
        Route::About => html! { <About /> },
        Route::NotFound => html! { <NotFound /> },
    };

    if route.is_protected() {
        html! { <RequireAuth {route}>{view}</RequireAuth> }
    } else {
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.to_path(), "/");
        assert_eq!(Route::Register.to_path(), "/register");
        assert_eq!(Route::Login.to_path(), "/login");
        assert_eq!(Route::Profile.to_path(), "/profile");
        assert_eq!(Route::About.to_path(), "/about");
        assert_eq!(Route::not_found_route(), Some(Route::NotFound));
    }

    #[test]
    fn test_only_profile_is_protected() {
        let protected: Vec<_> = [
            Route::Home,
            Route::Register,
            Route::Login,
            Route::Profile,
            Route::About,
            Route::NotFound,
        ]
        .into_iter()
        .filter(Protected::is_protected)
        .collect();
        assert_eq!(protected, [Route::Profile]);
    }

    #[test]
    fn test_sign_in_and_out_destinations() {
        assert_eq!(Route::AFTER_SIGN_IN.to_path(), "/");
        assert_eq!(Route::AFTER_SIGN_OUT.to_path(), "/login");
        assert!(!Route::AFTER_SIGN_OUT.is_protected());
    }
}
