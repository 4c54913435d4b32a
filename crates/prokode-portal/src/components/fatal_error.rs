//! Static page shown when the sign-in widget cannot start.

use tracing::debug;
use yew::prelude::*;
use yewdux::prelude::use_selector;

use crate::store::PortalStore;

#[function_component(FatalErrorPage)]
pub(crate) fn fatal_error_page() -> Html {
    let detail = use_selector(|store: &PortalStore| store.fatal.clone());

    html! {
        <div class="fatal-error" role="alert">
            <h2>{"Sign-in is unavailable"}</h2>
            <p>{"The sign-in service could not be started. Please reload the page or try again later."}</p>
            {if let Some(detail) = &*detail {
                html! { <p class="muted"><code>{detail}</code></p> }
            } else { html! {} }}
            <button class="solid" onclick={Callback::from(|_| {
                if let Err(err) = gloo::utils::window().location().reload() {
                    debug!(error = ?err, "page reload refused");
                }
            })}>{"Reload"}</button>
        </div>
    }
}
