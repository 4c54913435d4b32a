//! Page behaviors installed once a session is established.
//!
//! # Design
//! - Each feature owns its listeners and observers; dropping them in
//!   `teardown` detaches everything.
//! - A feature that cannot find its elements fails its own install only.

mod keyboard;
mod lazy_images;
mod mobile_nav;
mod scroll_effects;
mod smooth_anchors;

use gloo::utils::document;
use js_sys::Array;
use prokode_auth::{Feature, PortalError, PortalResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry};

use crate::app::EventSink;

pub(crate) use mobile_nav::set_nav_open;

/// Every page feature, in install order.
pub(crate) fn all(sink: EventSink) -> Vec<Box<dyn Feature>> {
    vec![
        Box::new(mobile_nav::MobileNav::default()),
        Box::new(scroll_effects::ScrollEffects::default()),
        Box::new(lazy_images::LazyImages::default()),
        Box::new(smooth_anchors::SmoothAnchors::default()),
        Box::new(keyboard::KeyboardShortcuts::new(sink)),
    ]
}

/// Runs a callback once for each matching element that scrolls into view.
pub(crate) struct VisibilityWatch {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl VisibilityWatch {
    /// Observe every element matching `selector`. Returns `None` when nothing matches.
    pub(crate) fn observe(
        feature: &'static str,
        selector: &str,
        on_visible: impl Fn(&Element) + 'static,
    ) -> PortalResult<Option<Self>> {
        let targets = document()
            .query_selector_all(selector)
            .map_err(|_| PortalError::FeatureInstall {
                feature,
                detail: format!("invalid selector {selector}"),
            })?;
        if targets.length() == 0 {
            return Ok(None);
        }

        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        let target = entry.target();
                        on_visible(&target);
                        observer.unobserve(&target);
                    }
                }
            },
        );
        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref()).map_err(
            |_| PortalError::FeatureInstall {
                feature,
                detail: "IntersectionObserver unavailable".to_string(),
            },
        )?;
        for index in 0..targets.length() {
            if let Some(element) = targets
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            {
                observer.observe(&element);
            }
        }
        Ok(Some(Self {
            observer,
            _callback: callback,
        }))
    }
}

impl Drop for VisibilityWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
