//! Deferred image loading.

use prokode_auth::{AuthCapabilities, Feature, PortalResult};
use tracing::debug;

use super::VisibilityWatch;
use crate::dom::set_attribute;
use crate::dom_ids::LAZY_IMAGE_SELECTOR;

const NAME: &str = "lazy_images";

#[derive(Default)]
pub(crate) struct LazyImages {
    watch: Option<VisibilityWatch>,
}

impl Feature for LazyImages {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install(&mut self, _auth: &dyn AuthCapabilities) -> PortalResult<()> {
        self.watch = VisibilityWatch::observe(NAME, LAZY_IMAGE_SELECTOR, |image| {
            if let Some(source) = image.get_attribute("data-src") {
                set_attribute(image, "src", &source);
                if image.remove_attribute("data-src").is_err() {
                    debug!(feature = NAME, "failed to clear deferred source");
                }
            }
        })?;
        if self.watch.is_none() {
            debug!("no deferred images on page");
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.watch = None;
    }
}
