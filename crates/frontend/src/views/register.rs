use super::credentials::{CredentialsForm, Submission};
use crate::context::use_session;
use crate::routes::Route;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(Register)]
pub fn register() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let busy = use_state(|| false);
    let error = use_state(|| None::<AttrValue>);

    let on_submit = {
        let busy = busy.clone();
        let error = error.clone();
        Callback::from(move |submission: Submission| {
            let session = session.clone();
            let navigator = navigator.clone();
            let busy = busy.clone();
            let error = error.clone();
            busy.set(true);
            error.set(None);
            spawn_local(async move {
                match session.register(&submission.email, &submission.password).await {
                    Ok(true) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::AFTER_SIGN_IN);
                        }
                    }
                    Ok(false) => error.set(Some("Registration failed. Please try again.".into())),
                    Err(err) => error.set(Some(format!("Registration failed: {err}").into())),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <>
            <CredentialsForm
                title="Create Account"
                submit_label="Register"
                {on_submit}
                busy={*busy}
                error={(*error).clone()}
            />
            <p class="mt-6 text-center text-sm text-gray-600">
                {"Already registered? "}
                <Link<Route> to={Route::Login}>{"Sign In"}</Link<Route>>
            </p>
        </>
    }
}
