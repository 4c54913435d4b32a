//! Browser entry point: telemetry, configuration, then the portal host.

use chrono::{DateTime, Utc};
use gloo::utils::document;
use prokode_auth::PortalError;
use tracing::{debug, error};
use yew::platform::spawn_local;
use yewdux::prelude::Dispatch;

use crate::components::{FatalErrorPage, LoginPanel};
use crate::dom::set_hidden;
use crate::dom_ids::{LOGIN_STATUS, PROTECTED_CONTENT, SIGNIN_CONTAINER};
use crate::store::PortalStore;
use crate::telemetry;

mod config;
mod host;
mod scheduler;

pub(crate) use host::EventSink;

/// Boot the portal on the current page.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let telemetry = telemetry::init();
    let panel_mounted = mount_login_panel();
    spawn_local(async move {
        let config = config::load_config().await;
        if let Some(telemetry) = &telemetry {
            telemetry.set_level(&config.log_level);
        }
        match host::PortalHost::create(&config) {
            Ok(host) => host.start(),
            Err(err) => show_fatal(&err, panel_mounted),
        }
    });
}

/// Wall-clock time from the browser clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

fn mount_login_panel() -> bool {
    match document().get_element_by_id(LOGIN_STATUS) {
        Some(root) => {
            yew::Renderer::<LoginPanel>::with_root(root).render();
            true
        }
        None => {
            debug!(id = LOGIN_STATUS, "login status panel not mounted");
            false
        }
    }
}

fn show_fatal(err: &PortalError, panel_mounted: bool) {
    error!(error = %err, detail = ?err, "sign-in unavailable");
    let detail = match err {
        PortalError::WidgetConstruction { detail } => detail.clone(),
        other => other.to_string(),
    };
    Dispatch::<PortalStore>::new().reduce_mut(|store| store.fatal = Some(detail));
    set_hidden(PROTECTED_CONTENT, true);
    set_hidden(SIGNIN_CONTAINER, true);
    if !panel_mounted && let Some(body) = document().body() {
        yew::Renderer::<FatalErrorPage>::with_root(body.into()).render();
    }
}
