//! Authentication guard component for protected routes

use crate::context::{use_auth_state, use_session};
use crate::routes::Route;
use turnstile_session::{Navigation, RouteGuard};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    pub route: Route,
    pub children: Children,
}

/// Renders its children only once the session allows `route`
///
/// The check runs again whenever the authentication state changes, so
/// signing out while on a protected page leads back to the login page.
#[function_component(RequireAuth)]
pub fn require_auth(props: &RequireAuthProps) -> Html {
    let session = use_session();
    let authenticated = use_auth_state().authenticated;
    let decision = use_state(|| None::<Navigation<Route>>);

    {
        let decision = decision.clone();
        use_effect_with((props.route, authenticated), move |&(route, _)| {
            let guard = RouteGuard::new(session, Route::Login);
            spawn_local(async move {
                decision.set(Some(guard.check(&route).await));
            });
        });
    }

    match &*decision {
        None => html! {
            <div class="flex flex-col items-center justify-center min-h-screen">
                <div class="w-10 h-10 border-4 border-gray-200 border-t-blue-500 rounded-full animate-spin mb-4"></div>
                <p class="text-gray-600">{"Checking authentication..."}</p>
            </div>
        },
        Some(Navigation::Allow) => html! { <>{ props.children.clone() }</> },
        Some(Navigation::Redirect(to)) => html! { <Redirect<Route> to={*to} /> },
    }
}
