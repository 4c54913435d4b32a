//! Keyboard shortcuts: `Ctrl+Shift+L` signs out, `Escape` closes the nav.

use gloo::events::{EventListener, EventListenerOptions};
use gloo::utils::document;
use prokode_auth::{AuthCapabilities, Feature, PortalError, PortalEvent, PortalResult};
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, KeyboardEvent};

use super::set_nav_open;
use crate::app::EventSink;
use crate::logic::{ShortcutOutcome, interpret_shortcut, is_editable_tag};

const NAME: &str = "keyboard_shortcuts";

pub(crate) struct KeyboardShortcuts {
    sink: EventSink,
    listener: Option<EventListener>,
}

impl KeyboardShortcuts {
    pub(crate) const fn new(sink: EventSink) -> Self {
        Self {
            sink,
            listener: None,
        }
    }
}

impl Feature for KeyboardShortcuts {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install(&mut self, auth: &dyn AuthCapabilities) -> PortalResult<()> {
        if !auth.is_authenticated() {
            return Err(PortalError::FeatureInstall {
                feature: NAME,
                detail: "no active session".to_string(),
            });
        }
        debug!(user = ?auth.display_name(), "keyboard shortcuts enabled");
        let sink = self.sink.clone();
        self.listener = Some(EventListener::new_with_options(
            &document(),
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let editable = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .is_some_and(|target| is_editable_tag(&target.tag_name()));
                let ctrl = event.ctrl_key() || event.meta_key();
                match interpret_shortcut(&event.key(), ctrl, event.shift_key(), editable) {
                    Some(ShortcutOutcome::Logout) => {
                        event.prevent_default();
                        sink.dispatch(PortalEvent::LogoutRequested);
                    }
                    Some(ShortcutOutcome::CloseNav) => set_nav_open(false),
                    None => {}
                }
            },
        ));
        Ok(())
    }

    fn teardown(&mut self) {
        self.listener = None;
    }
}
