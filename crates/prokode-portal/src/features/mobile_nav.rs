//! Mobile navigation toggle.

use gloo::events::EventListener;
use prokode_auth::{AuthCapabilities, Feature, PortalError, PortalResult};

use crate::dom::{element, set_attribute, toggle_attribute};
use crate::dom_ids::{NAV_TOGGLE, SITE_NAV};

#[derive(Default)]
pub(crate) struct MobileNav {
    listener: Option<EventListener>,
}

fn nav_open() -> bool {
    element(SITE_NAV).is_some_and(|nav| nav.has_attribute("data-open"))
}

/// Open or close the navigation and keep the toggle's ARIA state in sync.
pub(crate) fn set_nav_open(open: bool) {
    if let Some(nav) = element(SITE_NAV) {
        toggle_attribute(&nav, "data-open", open);
    }
    if let Some(toggle) = element(NAV_TOGGLE) {
        set_attribute(&toggle, "aria-expanded", if open { "true" } else { "false" });
    }
}

impl Feature for MobileNav {
    fn name(&self) -> &'static str {
        "mobile_nav"
    }

    fn install(&mut self, _auth: &dyn AuthCapabilities) -> PortalResult<()> {
        let toggle = element(NAV_TOGGLE).ok_or(PortalError::MissingElement { id: NAV_TOGGLE })?;
        element(SITE_NAV).ok_or(PortalError::MissingElement { id: SITE_NAV })?;
        set_nav_open(false);
        self.listener = Some(EventListener::new(&toggle, "click", |_| {
            set_nav_open(!nav_open());
        }));
        Ok(())
    }

    fn teardown(&mut self) {
        self.listener = None;
        set_nav_open(false);
    }
}
