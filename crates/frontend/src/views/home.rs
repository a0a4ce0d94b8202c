use crate::context::use_auth_state;
use crate::routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(Home)]
pub fn home() -> Html {
    let auth = use_auth_state();

    html! {
        <div class="text-center">
            <h1 class="text-4xl font-extrabold text-gray-900">{"Turnstile"}</h1>
            <p class="mt-3 text-gray-500">
                {"Sign in once; expired access tokens are refreshed for you."}
            </p>
            <div class="mt-8 flex justify-center gap-4">
                if auth.authenticated {
                    <Link<Route> to={Route::Profile}>{"View your profile"}</Link<Route>>
                } else {
                    <Link<Route> to={Route::Login}>{"Sign In"}</Link<Route>>
                    <Link<Route> to={Route::Register}>{"Create an account"}</Link<Route>>
                }
            </div>
        </div>
    }
}
