use crate::context::{use_auth_state, use_session};
use crate::routes::Route;
use tracing::debug;
use turnstile_http::UserProfile;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

enum ProfileState {
    Loading,
    Loaded(UserProfile),
    Failed(String),
}

#[function_component(Profile)]
pub fn profile() -> Html {
    let session = use_session();
    let auth = use_auth_state();
    let navigator = use_navigator();
    let profile = use_state(|| ProfileState::Loading);

    {
        let session = session.clone();
        let profile = profile.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                match session.load_profile().await {
                    Ok(user) => profile.set(ProfileState::Loaded(user)),
                    Err(err) => {
                        debug!(error = %err, "Profile unavailable");
                        profile.set(ProfileState::Failed(err.to_string()));
                    }
                }
            });
        });
    }

    let on_logout = Callback::from(move |_: MouseEvent| {
        session.logout();
        if let Some(navigator) = &navigator {
            navigator.push(&Route::AFTER_SIGN_OUT);
        }
    });

    let body = match &*profile {
        ProfileState::Loading => html! { <p class="text-gray-600">{"Loading profile..."}</p> },
        ProfileState::Loaded(user) => html! {
            <dl class="space-y-2">
                <div>
                    <dt class="text-sm text-gray-500">{"Email"}</dt>
                    <dd>{user.email.clone()}</dd>
                </div>
                <div>
                    <dt class="text-sm text-gray-500">{"Role"}</dt>
                    <dd>{user.role.clone().unwrap_or_else(|| "user".to_string())}</dd>
                </div>
            </dl>
        },
        ProfileState::Failed(message) => html! {
            <p class="text-red-700">{format!("Could not load profile: {message}")}</p>
        },
    };

    html! {
        <div class="bg-white rounded-lg shadow-lg p-8">
            <h2 class="text-2xl font-semibold mb-6">
                {auth.email().map_or_else(|| "Profile".to_string(), |email| format!("Signed in as {email}"))}
            </h2>
            {body}
            <button
                onclick={on_logout}
                class="mt-6 px-4 py-2 bg-gray-200 hover:bg-gray-300 text-gray-700 rounded-md"
            >
                {"Sign Out"}
            </button>
        </div>
    }
}
