//! Read-only view of the auth state handed to feature modules.

use crate::gate::AuthGate;

/// Capabilities consumers may query. They never mutate auth state.
pub trait AuthCapabilities {
    /// Whether a session is active.
    fn is_authenticated(&self) -> bool;
    /// Whether the signed-in identity belongs to `group`; false when signed out.
    fn has_group(&self, group: &str) -> bool;
    /// Display name of the signed-in identity.
    fn display_name(&self) -> Option<String>;
}

impl AuthCapabilities for AuthGate {
    fn is_authenticated(&self) -> bool {
        Self::is_authenticated(self)
    }

    fn has_group(&self, group: &str) -> bool {
        Self::has_group(self, group)
    }

    fn display_name(&self) -> Option<String> {
        self.identity()
            .map(|identity| identity.display_name().to_string())
    }
}
