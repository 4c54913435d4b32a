//! Status panel rendered above the widget's form.

use yew::prelude::*;
use yewdux::prelude::use_selector;

use super::FatalErrorPage;
use crate::store::{LoginPhase, PortalStore};

#[function_component(LoginPanel)]
pub(crate) fn login_panel() -> Html {
    let login = use_selector(|store: &PortalStore| store.login.clone());
    let fatal = use_selector(|store: &PortalStore| store.fatal.is_some());

    if *fatal {
        return html! { <FatalErrorPage /> };
    }

    match login.phase {
        LoginPhase::Loading => html! {
            <div class="login-status loading" role="status" aria-live="polite">
                <span class="spinner" aria-hidden="true"></span>
                <span>{"Checking your session…"}</span>
            </div>
        },
        LoginPhase::SignIn => html! {
            <div class="login-status" aria-live="polite">
                {if let Some(notice) = &login.notice {
                    html! { <p class="notice">{notice}</p> }
                } else { html! {} }}
                {if let Some(error) = &login.error {
                    html! { <p class="error-text" role="alert">{error}</p> }
                } else { html! {} }}
            </div>
        },
        LoginPhase::SignedIn => html! {},
    }
}
