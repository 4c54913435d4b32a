//! Header shadow on scroll and reveal-on-scroll animations.

use gloo::events::EventListener;
use gloo::utils::window;
use prokode_auth::{AuthCapabilities, Feature, PortalError, PortalResult};
use tracing::debug;

use super::VisibilityWatch;
use crate::dom::{element, toggle_attribute};
use crate::dom_ids::{REVEAL_SELECTOR, SITE_HEADER};
use crate::logic::header_scrolled;

const NAME: &str = "scroll_effects";

#[derive(Default)]
pub(crate) struct ScrollEffects {
    scroll: Option<EventListener>,
    reveal: Option<VisibilityWatch>,
}

fn sync_header() {
    let scrolled = header_scrolled(window().scroll_y().unwrap_or_default());
    if let Some(header) = element(SITE_HEADER) {
        toggle_attribute(&header, "data-scrolled", scrolled);
    }
}

impl Feature for ScrollEffects {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install(&mut self, _auth: &dyn AuthCapabilities) -> PortalResult<()> {
        element(SITE_HEADER).ok_or(PortalError::MissingElement { id: SITE_HEADER })?;
        sync_header();
        self.scroll = Some(EventListener::new(&window(), "scroll", |_| sync_header()));
        self.reveal = VisibilityWatch::observe(NAME, REVEAL_SELECTOR, |element| {
            if element.class_list().add_1("is-visible").is_err() {
                debug!(feature = NAME, "failed to mark element visible");
            }
        })?;
        Ok(())
    }

    fn teardown(&mut self) {
        self.scroll = None;
        self.reveal = None;
    }
}
