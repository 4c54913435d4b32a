//! Feature fakes.

use std::cell::Cell;
use std::rc::Rc;

use prokode_auth::{AuthCapabilities, Feature, PortalError, PortalResult};

/// Counters shared with a feature after it moves into a registry.
#[derive(Clone, Debug, Default)]
pub struct FeatureProbe {
    installs: Rc<Cell<u32>>,
    teardowns: Rc<Cell<u32>>,
    saw_authenticated: Rc<Cell<bool>>,
}

impl FeatureProbe {
    /// Successful installs.
    #[must_use]
    pub fn installs(&self) -> u32 {
        self.installs.get()
    }

    /// Teardowns.
    #[must_use]
    pub fn teardowns(&self) -> u32 {
        self.teardowns.get()
    }

    /// Whether the capability view reported a session at install time.
    #[must_use]
    pub fn saw_authenticated(&self) -> bool {
        self.saw_authenticated.get()
    }
}

/// Feature that counts installs and teardowns.
#[derive(Debug)]
pub struct CountingFeature {
    name: &'static str,
    probe: FeatureProbe,
}

impl CountingFeature {
    /// New feature and its probe.
    #[must_use]
    pub fn new(name: &'static str) -> (Box<dyn Feature>, FeatureProbe) {
        let probe = FeatureProbe::default();
        (
            Box::new(Self {
                name,
                probe: probe.clone(),
            }),
            probe,
        )
    }
}

impl Feature for CountingFeature {
    fn name(&self) -> &'static str {
        self.name
    }

    fn install(&mut self, auth: &dyn AuthCapabilities) -> PortalResult<()> {
        self.probe.installs.set(self.probe.installs.get() + 1);
        self.probe.saw_authenticated.set(auth.is_authenticated());
        Ok(())
    }

    fn teardown(&mut self) {
        self.probe.teardowns.set(self.probe.teardowns.get() + 1);
    }
}

/// Feature whose install always fails.
#[derive(Debug)]
pub struct FailingFeature {
    name: &'static str,
}

impl FailingFeature {
    /// New failing feature.
    #[must_use]
    pub fn new(name: &'static str) -> Box<dyn Feature> {
        Box::new(Self { name })
    }
}

impl Feature for FailingFeature {
    fn name(&self) -> &'static str {
        self.name
    }

    fn install(&mut self, _auth: &dyn AuthCapabilities) -> PortalResult<()> {
        Err(PortalError::MissingElement { id: "nav-toggle" })
    }
}
