//! Registry of page features wired once a session exists.
//!
//! # Design
//! - Features are independent; one failing to install never blocks the rest.
//! - A single `initialized` flag makes repeated authenticated signals harmless.

use tracing::{debug, warn};

use crate::capability::AuthCapabilities;
use crate::error::PortalResult;

/// A self-contained page behavior.
pub trait Feature {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Wire the feature into the page.
    ///
    /// # Errors
    ///
    /// Returns an error when the feature cannot be wired; the registry logs it
    /// and moves on.
    fn install(&mut self, auth: &dyn AuthCapabilities) -> PortalResult<()>;

    /// Release listeners and observers. Defaults to nothing.
    fn teardown(&mut self) {}
}

/// Fixed list of features with an install-once guard.
pub struct FeatureRegistry {
    features: Vec<Box<dyn Feature>>,
    installed: Vec<usize>,
    initialized: bool,
}

impl FeatureRegistry {
    /// Registry over the given features, in install order.
    #[must_use]
    pub fn new(features: Vec<Box<dyn Feature>>) -> Self {
        Self {
            features,
            installed: Vec::new(),
            initialized: false,
        }
    }

    /// Install every feature once. Returns how many installed on this call.
    pub fn initialize(&mut self, auth: &dyn AuthCapabilities) -> usize {
        if self.initialized {
            debug!("features already initialized");
            return 0;
        }
        self.initialized = true;
        for (index, feature) in self.features.iter_mut().enumerate() {
            match feature.install(auth) {
                Ok(()) => {
                    debug!(feature = feature.name(), "feature installed");
                    self.installed.push(index);
                }
                Err(err) => {
                    warn!(feature = feature.name(), error = %err, detail = ?err, "feature skipped");
                }
            }
        }
        self.installed.len()
    }

    /// Whether [`Self::initialize`] has run.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Names of installed features, in install order.
    #[must_use]
    pub fn installed(&self) -> Vec<&'static str> {
        self.installed
            .iter()
            .filter_map(|index| self.features.get(*index))
            .map(|feature| feature.name())
            .collect()
    }

    /// Tear down installed features and clear the guard.
    pub fn teardown(&mut self) {
        for index in self.installed.drain(..) {
            if let Some(feature) = self.features.get_mut(index) {
                feature.teardown();
            }
        }
        self.initialized = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortalError;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe {
        name: &'static str,
        fail: bool,
        installs: Rc<Cell<u32>>,
        teardowns: Rc<Cell<u32>>,
    }

    impl Feature for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn install(&mut self, _auth: &dyn AuthCapabilities) -> PortalResult<()> {
            if self.fail {
                return Err(PortalError::FeatureInstall {
                    feature: self.name,
                    detail: "boom".to_string(),
                });
            }
            self.installs.set(self.installs.get() + 1);
            Ok(())
        }

        fn teardown(&mut self) {
            self.teardowns.set(self.teardowns.get() + 1);
        }
    }

    struct Anonymous;

    impl AuthCapabilities for Anonymous {
        fn is_authenticated(&self) -> bool {
            true
        }

        fn has_group(&self, _group: &str) -> bool {
            false
        }

        fn display_name(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn failing_feature_does_not_block_siblings() {
        let installs = Rc::new(Cell::new(0));
        let teardowns = Rc::new(Cell::new(0));
        let probe = |name, fail| -> Box<dyn Feature> {
            Box::new(Probe {
                name,
                fail,
                installs: installs.clone(),
                teardowns: teardowns.clone(),
            })
        };
        let mut registry = FeatureRegistry::new(vec![
            probe("nav", false),
            probe("broken", true),
            probe("lazy", false),
        ]);
        assert_eq!(registry.initialize(&Anonymous), 2);
        assert_eq!(registry.installed(), vec!["nav", "lazy"]);
        assert_eq!(installs.get(), 2);

        assert_eq!(registry.initialize(&Anonymous), 0);
        assert_eq!(installs.get(), 2);

        registry.teardown();
        assert_eq!(teardowns.get(), 2);
        assert!(!registry.is_initialized());
        assert!(registry.installed().is_empty());
    }
}
