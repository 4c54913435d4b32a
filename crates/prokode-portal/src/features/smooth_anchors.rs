//! Smooth scrolling for in-page anchors.

use gloo::events::{EventListener, EventListenerOptions};
use gloo::utils::document;
use prokode_auth::{AuthCapabilities, Feature, PortalResult};
use wasm_bindgen::JsCast;
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions};

use crate::logic::anchor_target;

#[derive(Default)]
pub(crate) struct SmoothAnchors {
    listener: Option<EventListener>,
}

impl Feature for SmoothAnchors {
    fn name(&self) -> &'static str {
        "smooth_anchors"
    }

    fn install(&mut self, _auth: &dyn AuthCapabilities) -> PortalResult<()> {
        self.listener = Some(EventListener::new_with_options(
            &document(),
            "click",
            EventListenerOptions::enable_prevent_default(),
            |event| {
                let Some(link) = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .and_then(|target| target.closest("a[href^='#']").ok().flatten())
                else {
                    return;
                };
                let Some(destination) = link
                    .get_attribute("href")
                    .as_deref()
                    .and_then(anchor_target)
                    .and_then(|id| document().get_element_by_id(id))
                else {
                    return;
                };
                event.prevent_default();
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                destination.scroll_into_view_with_scroll_into_view_options(&options);
            },
        ));
        Ok(())
    }

    fn teardown(&mut self) {
        self.listener = None;
    }
}
