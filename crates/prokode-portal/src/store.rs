//! Shared yewdux store for the login surface.
//!
//! # Design
//! - The portal core decides what is shown; the store only mirrors it for
//!   the Yew components.
//! - Reducers are plain methods so they can be tested natively.

use yewdux::store::Store;

/// Global store for the login panel and fatal error page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct PortalStore {
    /// Login panel state.
    pub login: LoginSlice,
    /// Set when the widget could not be constructed.
    pub fatal: Option<String>,
}

/// Which view the login panel shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginPhase {
    /// Restoring a session.
    #[default]
    Loading,
    /// Waiting for credentials.
    SignIn,
    /// Signed in; the panel is hidden.
    SignedIn,
}

/// Login panel state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginSlice {
    /// Current phase.
    pub phase: LoginPhase,
    /// Notice above the form (for example after a session expired).
    pub notice: Option<String>,
    /// Last sign-in error.
    pub error: Option<String>,
}

impl LoginSlice {
    /// Enter the loading phase.
    pub fn loading(&mut self) {
        self.phase = LoginPhase::Loading;
        self.error = None;
    }

    /// Show the form with an optional notice; clears stale errors.
    pub fn sign_in(&mut self, notice: Option<&str>) {
        self.phase = LoginPhase::SignIn;
        self.notice = notice.map(ToString::to_string);
        self.error = None;
    }

    /// Hide the panel.
    pub fn signed_in(&mut self) {
        self.phase = LoginPhase::SignedIn;
        self.notice = None;
        self.error = None;
    }

    /// Record a sign-in error. Ignored once signed in.
    pub fn failed(&mut self, message: &str) {
        if self.phase != LoginPhase::SignedIn {
            self.phase = LoginPhase::SignIn;
            self.error = Some(message.to_string());
        }
    }
}
