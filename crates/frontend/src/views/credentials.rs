//! Email and password form shared by the login and registration pages

use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Submitted email and password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub email: String,
    pub password: String,
}

#[derive(Properties, PartialEq)]
pub struct CredentialsFormProps {
    pub title: AttrValue,
    pub submit_label: AttrValue,
    pub on_submit: Callback<Submission>,
    #[prop_or_default]
    pub busy: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
}

#[function_component(CredentialsForm)]
pub fn credentials_form(props: &CredentialsFormProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let onsubmit = {
        let email = email.clone();
        let password = password.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(Submission {
                email: (*email).clone(),
                password: (*password).clone(),
            });
        })
    };

    let can_submit = !props.busy && !email.is_empty() && !password.is_empty();

    html! {
        <div class="max-w-md mx-auto bg-white rounded-lg shadow-lg p-8">
            <h2 class="text-2xl font-semibold mb-6">{props.title.clone()}</h2>
            if let Some(error) = &props.error {
                <div class="mb-4 p-3 bg-red-50 border border-red-200 text-red-700 rounded-md">
                    {error.clone()}
                </div>
            }
            <form {onsubmit} class="space-y-4">
                <input
                    type="email"
                    placeholder="Email"
                    value={(*email).clone()}
                    oninput={on_email_input}
                    class="w-full px-3 py-2 border border-gray-300 rounded-md"
                />
                <input
                    type="password"
                    placeholder="Password"
                    value={(*password).clone()}
                    oninput={on_password_input}
                    class="w-full px-3 py-2 border border-gray-300 rounded-md"
                />
                <button
                    type="submit"
                    disabled={!can_submit}
                    class="w-full px-4 py-2 text-white bg-blue-600 hover:bg-blue-700 rounded-md disabled:opacity-50"
                >
                    {if props.busy { "Please wait..." } else { props.submit_label.as_str() }}
                </button>
            </form>
        </div>
    }
}
