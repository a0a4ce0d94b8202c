use crate::context::{SessionProvider, use_auth_state, use_session};
use crate::routes::{Route, switch};
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <SessionProvider>
            <BrowserRouter>
                <Nav />
                <main class="max-w-3xl mx-auto px-4 py-8">
                    <Switch<Route> render={switch} />
                </main>
            </BrowserRouter>
        </SessionProvider>
    }
}

#[function_component(Nav)]
fn nav() -> Html {
    let session = use_session();
    let auth = use_auth_state();
    let navigator = use_navigator();

    let on_logout = Callback::from(move |_: MouseEvent| {
        session.logout();
        if let Some(navigator) = &navigator {
            navigator.push(&Route::AFTER_SIGN_OUT);
        }
    });

    html! {
        <nav class="bg-white border-b border-gray-200">
            <div class="max-w-3xl mx-auto px-4 flex justify-between h-16 items-center">
                <div class="flex items-center gap-4">
                    <Link<Route> to={Route::Home} classes={classes!("text-xl", "font-bold")}>{"Turnstile"}</Link<Route>>
                    <Link<Route> to={Route::About}>{"About"}</Link<Route>>
                </div>
                <div class="flex items-center gap-4">
                    if auth.authenticated {
                        <Link<Route> to={Route::Profile}>
                            {auth.email().unwrap_or("Profile").to_string()}
                        </Link<Route>>
                        <button onclick={on_logout} class="text-sm text-gray-600 hover:text-gray-900">
                            {"Sign Out"}
                        </button>
                    } else {
                        <Link<Route> to={Route::Login}>{"Sign In"}</Link<Route>>
                        <Link<Route> to={Route::Register}>{"Register"}</Link<Route>>
                    }
                </div>
            </div>
        </nav>
    }
}
