//! The portal context: one owned value tying gate, monitor, features and
//! role projection together.
//!
//! # Design
//! - The browser host feeds [`PortalEvent`]s in and executes the returned
//!   [`WidgetRequest`]s; nothing here touches the widget or the DOM directly.
//! - Leaving the authenticated state stops the timers and clears role
//!   elements before the login view is rendered.
//! - Created with [`Portal::create`], released with [`Portal::teardown`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::capability::AuthCapabilities;
use crate::config::PortalConfig;
use crate::features::{Feature, FeatureRegistry};
use crate::gate::{AuthGate, GateTransition, LogoutDecision, SignedOutReason, Ticket};
pub use crate::gate::{WidgetFailure, WidgetOutcome};
use crate::identity::Identity;
use crate::login_errors::{SESSION_EXPIRED_MESSAGE, login_error_message};
use crate::monitor::{Scheduler, SessionMonitor, SessionTrigger};
use crate::roles::{RoleProjector, RoleSurface};

/// Prompt shown before an elevated identity logs out.
pub const LOGOUT_CONFIRM_PROMPT: &str =
    "You are signed in with administrator access. Sign out of the portal?";

/// Page regions the portal toggles.
pub trait PageView {
    /// Show the loading state while a session is being restored.
    fn show_loading(&mut self);
    /// Show the login overlay and hide protected content.
    fn show_sign_in(&mut self, notice: Option<&str>);
    /// Hide the login overlay and show protected content for `identity`.
    fn show_protected(&mut self, identity: &Identity);
    /// Show a sign-in error; the form stays interactive.
    fn show_sign_in_error(&mut self, message: &str);
}

/// Inputs from the browser host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalEvent {
    /// A restore attempt finished.
    SessionRestored {
        /// Ticket the request carried.
        ticket: Ticket,
        /// Widget outcome.
        outcome: WidgetOutcome,
    },
    /// The widget's success callback fired and tokens were stored.
    SignInSucceeded {
        /// Identity extracted from the returned claims.
        identity: Identity,
    },
    /// The widget's failure callback fired.
    SignInFailed {
        /// Reported failure.
        failure: WidgetFailure,
    },
    /// A re-validation finished.
    Revalidated {
        /// Ticket the request carried.
        ticket: Ticket,
        /// Widget outcome.
        outcome: WidgetOutcome,
    },
    /// A session timer fired.
    Trigger {
        /// Which timer.
        trigger: SessionTrigger,
        /// Wall-clock time of the fire.
        at: DateTime<Utc>,
    },
    /// The document visibility changed.
    VisibilityChanged {
        /// Whether the tab is now visible.
        visible: bool,
        /// Wall-clock time of the change.
        at: DateTime<Utc>,
    },
    /// The user produced qualifying input.
    Activity,
    /// The user asked to log out.
    LogoutRequested,
    /// Answer to a logout confirmation.
    LogoutConfirmed {
        /// Whether the user confirmed.
        confirmed: bool,
    },
}

/// Work the host must perform against the widget or the browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetRequest {
    /// Ask whether a previously issued token still resolves.
    RestoreSession {
        /// Ticket to echo back.
        ticket: Ticket,
        /// Wait this long first.
        delay: Duration,
    },
    /// Render the credential form.
    ShowSignIn,
    /// Re-validate the current token.
    Revalidate {
        /// Ticket to echo back.
        ticket: Ticket,
    },
    /// Clear tokens from the widget's storage.
    ClearTokens,
    /// Ask the user to confirm logout.
    ConfirmLogout {
        /// Prompt text.
        prompt: String,
    },
}

/// Owned portal context.
pub struct Portal<V, S>
where
    V: PageView + RoleSurface,
    S: Scheduler,
{
    gate: AuthGate,
    monitor: SessionMonitor<S>,
    features: FeatureRegistry,
    projector: RoleProjector,
    view: V,
    projected_groups: Option<Vec<String>>,
    awaiting_confirmation: bool,
}

impl<V, S> Portal<V, S>
where
    V: PageView + RoleSurface,
    S: Scheduler,
{
    /// Build the context. Nothing happens until [`Self::start`].
    #[must_use]
    pub fn create(
        config: &PortalConfig,
        view: V,
        scheduler: S,
        features: Vec<Box<dyn Feature>>,
    ) -> Self {
        Self {
            gate: AuthGate::new(
                config.restore,
                config.session.stale_responses,
                config.roles.elevated_groups.clone(),
            ),
            monitor: SessionMonitor::new(scheduler, config.session),
            features: FeatureRegistry::new(features),
            projector: RoleProjector::new(&config.roles),
            view,
            projected_groups: None,
            awaiting_confirmation: false,
        }
    }

    /// Enter the loading state and request the first restore attempt.
    pub fn start(&mut self) -> Vec<WidgetRequest> {
        self.monitor.stop();
        let ticket = self.gate.initialize();
        self.view.show_loading();
        vec![WidgetRequest::RestoreSession {
            ticket,
            delay: Duration::ZERO,
        }]
    }

    /// Feed one event through the state machine.
    pub fn handle(&mut self, event: PortalEvent) -> Vec<WidgetRequest> {
        match event {
            PortalEvent::SessionRestored { ticket, outcome } => {
                let transition = self.gate.on_restore(ticket, outcome);
                self.apply(transition)
            }
            PortalEvent::SignInSucceeded { identity } => {
                let transition = self.gate.sign_in(identity);
                self.apply(transition)
            }
            PortalEvent::SignInFailed { failure } => {
                if !self.gate.is_authenticated() {
                    let message = login_error_message(failure.code.as_deref().unwrap_or_default());
                    info!(code = ?failure.code, detail = %failure.detail, "sign-in rejected");
                    self.view.show_sign_in_error(message);
                }
                Vec::new()
            }
            PortalEvent::Revalidated { ticket, outcome } => {
                let transition = self.gate.on_revalidated(ticket, outcome);
                self.apply(transition)
            }
            PortalEvent::Trigger { trigger, at } => {
                if self.monitor.on_trigger(trigger) {
                    self.revalidate(trigger, at)
                } else {
                    Vec::new()
                }
            }
            PortalEvent::VisibilityChanged { visible, at } => {
                match self.monitor.on_visibility_change(visible) {
                    Some(trigger) => self.revalidate(trigger, at),
                    None => Vec::new(),
                }
            }
            PortalEvent::Activity => {
                self.monitor.record_activity();
                Vec::new()
            }
            PortalEvent::LogoutRequested => match self.gate.logout_decision() {
                LogoutDecision::NotSignedIn => Vec::new(),
                LogoutDecision::Proceed => self.logout(),
                LogoutDecision::Confirm => {
                    self.awaiting_confirmation = true;
                    vec![WidgetRequest::ConfirmLogout {
                        prompt: LOGOUT_CONFIRM_PROMPT.to_string(),
                    }]
                }
            },
            PortalEvent::LogoutConfirmed { confirmed } => {
                if !std::mem::take(&mut self.awaiting_confirmation) {
                    return Vec::new();
                }
                if confirmed {
                    self.logout()
                } else {
                    debug!("logout cancelled");
                    Vec::new()
                }
            }
        }
    }

    /// Stop timers and release feature wiring.
    pub fn teardown(&mut self) {
        self.monitor.stop();
        self.features.teardown();
        self.awaiting_confirmation = false;
        debug!("portal torn down");
    }

    /// Auth gate (read-only).
    #[must_use]
    pub const fn gate(&self) -> &AuthGate {
        &self.gate
    }

    /// Read-only capability view for consumers.
    #[must_use]
    pub fn capabilities(&self) -> &dyn AuthCapabilities {
        &self.gate
    }

    /// Session monitor (read-only).
    #[must_use]
    pub const fn monitor(&self) -> &SessionMonitor<S> {
        &self.monitor
    }

    /// Feature registry (read-only).
    #[must_use]
    pub const fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    /// Page view.
    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    fn logout(&mut self) -> Vec<WidgetRequest> {
        self.awaiting_confirmation = false;
        let transition = self.gate.sign_out();
        self.apply(transition)
    }

    fn revalidate(&mut self, trigger: SessionTrigger, at: DateTime<Utc>) -> Vec<WidgetRequest> {
        let expired = match self.gate.identity() {
            None => return Vec::new(),
            Some(identity) => identity.is_expired(at),
        };
        if expired {
            info!(%trigger, "token expired locally");
            let transition = self.gate.expire();
            return self.apply(transition);
        }
        match self.gate.revalidation_ticket() {
            Some(ticket) => {
                debug!(%trigger, generation = ticket.generation, "re-validating session");
                vec![WidgetRequest::Revalidate { ticket }]
            }
            None => Vec::new(),
        }
    }

    fn apply(&mut self, transition: GateTransition) -> Vec<WidgetRequest> {
        match transition {
            GateTransition::Unchanged | GateTransition::Stale => Vec::new(),
            GateTransition::Retry { ticket, delay } => {
                vec![WidgetRequest::RestoreSession { ticket, delay }]
            }
            GateTransition::Authenticated { entered } => {
                if entered {
                    self.monitor.start();
                }
                self.render_authenticated();
                self.features.initialize(&self.gate);
                Vec::new()
            }
            GateTransition::Unauthenticated { reason } => {
                self.monitor.stop();
                self.view.clear_roles();
                self.projected_groups = None;
                let notice = (reason == SignedOutReason::Expired).then_some(SESSION_EXPIRED_MESSAGE);
                self.view.show_sign_in(notice);
                match reason {
                    SignedOutReason::LoggedOut | SignedOutReason::Expired => {
                        vec![WidgetRequest::ClearTokens, WidgetRequest::ShowSignIn]
                    }
                    SignedOutReason::NoSession | SignedOutReason::RestoreFailed => {
                        vec![WidgetRequest::ShowSignIn]
                    }
                }
            }
        }
    }

    fn render_authenticated(&mut self) {
        let Some(identity) = self.gate.identity() else {
            return;
        };
        self.view.show_protected(identity);
        if self
            .projected_groups
            .as_ref()
            .is_some_and(|groups| *groups != identity.groups)
        {
            self.view.clear_roles();
        }
        self.projector.apply(identity, &mut self.view);
        self.projected_groups = Some(identity.groups.clone());
    }
}
