use crate::routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    html! {
        <div class="text-center">
            <h2 class="text-2xl font-semibold">{"Page not found"}</h2>
            <Link<Route> to={Route::Home}>{"Back to Home"}</Link<Route>>
        </div>
    }
}
