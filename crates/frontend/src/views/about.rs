use crate::config::AppConfig;
use yew::prelude::*;

#[function_component(About)]
pub fn about() -> Html {
    html! {
        <div class="prose">
            <h2>{"About"}</h2>
            <p>
                {"Tokens are kept in this browser's local storage. Requests to the authentication \
                  service carry the access token, and a rejected token is refreshed once before \
                  the request is retried."}
            </p>
            <p class="text-sm text-gray-500">
                {format!("Authentication service: {}", AppConfig::api_base_url())}
            </p>
        </div>
    }
}
