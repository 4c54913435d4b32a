//! Authentication state machine.
//!
//! # Design
//! - The identity lives inside [`AuthStatus::Authenticated`], so it cannot
//!   outlive the state that owns it.
//! - Every transition bumps a generation counter. Widget requests carry a
//!   [`Ticket`] and results are checked against it before being applied.
//! - Downgrades are idempotent: signing out an unauthenticated gate is a no-op.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{RestorePolicy, StaleResponsePolicy};
use crate::identity::Identity;

/// Authentication state owned by the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// Session restore in progress.
    Loading,
    /// No usable session; the login form is shown.
    Unauthenticated,
    /// Signed in as the given identity.
    Authenticated(Identity),
}

impl AuthStatus {
    /// Short lowercase label for logs and the UI store.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

/// Correlates a widget response with the state that requested it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    /// Gate generation at request time.
    pub generation: u64,
    /// Restore attempt number (1-based), `0` for re-validation.
    pub attempt: u32,
}

/// Failure reported by a widget call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetFailure {
    /// Vendor error code when one was reported.
    pub code: Option<String>,
    /// Free-form failure detail.
    pub detail: String,
}

impl WidgetFailure {
    /// Failure without a vendor code.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            code: None,
            detail: detail.into(),
        }
    }

    /// Failure carrying a vendor code.
    #[must_use]
    pub fn with_code(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            detail: detail.into(),
        }
    }
}

/// Result of a widget lookup: a resolved identity, a definite "no session", or a failure.
pub type WidgetOutcome = Result<Option<Identity>, WidgetFailure>;

/// Why the gate moved to [`AuthStatus::Unauthenticated`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignedOutReason {
    /// The widget reported no existing session.
    NoSession,
    /// Every restore attempt failed.
    RestoreFailed,
    /// Re-validation rejected the session.
    Expired,
    /// The user logged out.
    LoggedOut,
}

/// Observable effect of feeding an input to the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateTransition {
    /// Nothing changed.
    Unchanged,
    /// The response was issued before the latest transition and was dropped.
    Stale,
    /// Restore failed; try again after `delay`.
    Retry {
        /// Ticket for the next attempt.
        ticket: Ticket,
        /// Delay before the next attempt.
        delay: Duration,
    },
    /// Now authenticated.
    Authenticated {
        /// `false` when the gate was already authenticated and only the identity was replaced.
        entered: bool,
    },
    /// Now unauthenticated.
    Unauthenticated {
        /// Reason for the downgrade.
        reason: SignedOutReason,
    },
}

/// What a logout request needs before it can proceed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogoutDecision {
    /// Identity is elevated; ask the user first.
    Confirm,
    /// Proceed immediately.
    Proceed,
    /// Nobody is signed in.
    NotSignedIn,
}

/// Single authority over whether protected content may be shown.
#[derive(Debug)]
pub struct AuthGate {
    status: AuthStatus,
    generation: u64,
    restore_attempt: u32,
    restore: RestorePolicy,
    stale: StaleResponsePolicy,
    elevated_groups: Vec<String>,
}

impl AuthGate {
    /// Create a gate in [`AuthStatus::Loading`].
    #[must_use]
    pub const fn new(
        restore: RestorePolicy,
        stale: StaleResponsePolicy,
        elevated_groups: Vec<String>,
    ) -> Self {
        Self {
            status: AuthStatus::Loading,
            generation: 0,
            restore_attempt: 0,
            restore,
            stale,
            elevated_groups,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &AuthStatus {
        &self.status
    }

    /// Current identity, present only while authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match &self.status {
            AuthStatus::Authenticated(identity) => Some(identity),
            AuthStatus::Loading | AuthStatus::Unauthenticated => None,
        }
    }

    /// Whether a session is active.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated(_))
    }

    /// Whether the current identity belongs to `group`; false when signed out.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        self.identity()
            .is_some_and(|identity| identity.has_group(group))
    }

    /// Transition counter.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Restore attempt in flight, `0` when none.
    #[must_use]
    pub const fn restore_attempt(&self) -> u32 {
        self.restore_attempt
    }

    /// Enter [`AuthStatus::Loading`] and return the ticket for the first restore attempt.
    pub fn initialize(&mut self) -> Ticket {
        self.generation += 1;
        self.status = AuthStatus::Loading;
        self.restore_attempt = 1;
        debug!(generation = self.generation, "auth gate initializing");
        Ticket {
            generation: self.generation,
            attempt: 1,
        }
    }

    /// Apply the result of a restore attempt.
    pub fn on_restore(&mut self, ticket: Ticket, outcome: WidgetOutcome) -> GateTransition {
        if !self.accepts(ticket, "restore") {
            return GateTransition::Stale;
        }
        match outcome {
            Ok(Some(identity)) => self.authenticate(identity),
            Ok(None) => self.sign_out_with(SignedOutReason::NoSession),
            Err(failure) => {
                if !matches!(self.status, AuthStatus::Loading) {
                    return GateTransition::Unchanged;
                }
                if ticket.attempt < self.restore.max_attempts {
                    let attempt = ticket.attempt + 1;
                    self.restore_attempt = attempt;
                    let delay = self.restore.delay_before(attempt);
                    debug!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        detail = %failure.detail,
                        "session restore failed; retrying"
                    );
                    return GateTransition::Retry {
                        ticket: Ticket {
                            generation: self.generation,
                            attempt,
                        },
                        delay,
                    };
                }
                warn!(
                    attempts = ticket.attempt,
                    detail = %failure.detail,
                    "session restore exhausted"
                );
                self.sign_out_with(SignedOutReason::RestoreFailed)
            }
        }
    }

    /// Accept an identity produced by the sign-in form.
    pub fn sign_in(&mut self, identity: Identity) -> GateTransition {
        self.authenticate(identity)
    }

    /// Ticket for a re-validation request, if a session is active.
    #[must_use]
    pub const fn revalidation_ticket(&self) -> Option<Ticket> {
        if self.is_authenticated() {
            Some(Ticket {
                generation: self.generation,
                attempt: 0,
            })
        } else {
            None
        }
    }

    /// Apply the result of a re-validation.
    pub fn on_revalidated(&mut self, ticket: Ticket, outcome: WidgetOutcome) -> GateTransition {
        if !self.accepts(ticket, "revalidate") {
            return GateTransition::Stale;
        }
        if !self.is_authenticated() {
            return GateTransition::Unchanged;
        }
        match outcome {
            Ok(Some(identity)) => self.authenticate(identity),
            Ok(None) => self.sign_out_with(SignedOutReason::Expired),
            Err(failure) => {
                info!(detail = %failure.detail, "session re-validation failed");
                self.sign_out_with(SignedOutReason::Expired)
            }
        }
    }

    /// Force the session closed.
    pub fn expire(&mut self) -> GateTransition {
        self.sign_out_with(SignedOutReason::Expired)
    }

    /// Decide whether a logout needs confirmation.
    #[must_use]
    pub fn logout_decision(&self) -> LogoutDecision {
        match self.identity() {
            None => LogoutDecision::NotSignedIn,
            Some(identity)
                if self
                    .elevated_groups
                    .iter()
                    .any(|group| identity.has_group(group)) =>
            {
                LogoutDecision::Confirm
            }
            Some(_) => LogoutDecision::Proceed,
        }
    }

    /// Log out. Idempotent.
    pub fn sign_out(&mut self) -> GateTransition {
        self.sign_out_with(SignedOutReason::LoggedOut)
    }

    fn accepts(&self, ticket: Ticket, operation: &'static str) -> bool {
        if ticket.generation == self.generation {
            return true;
        }
        match self.stale {
            StaleResponsePolicy::Discard => {
                warn!(
                    operation,
                    ticket_generation = ticket.generation,
                    generation = self.generation,
                    "discarding stale widget response"
                );
                false
            }
            StaleResponsePolicy::Apply => {
                warn!(
                    operation,
                    ticket_generation = ticket.generation,
                    generation = self.generation,
                    "applying stale widget response to current state"
                );
                true
            }
        }
    }

    fn authenticate(&mut self, identity: Identity) -> GateTransition {
        let entered = !self.is_authenticated();
        if entered {
            self.generation += 1;
            info!(
                generation = self.generation,
                user = identity.display_name(),
                "signed in"
            );
        }
        self.status = AuthStatus::Authenticated(identity);
        self.restore_attempt = 0;
        GateTransition::Authenticated { entered }
    }

    fn sign_out_with(&mut self, reason: SignedOutReason) -> GateTransition {
        if matches!(self.status, AuthStatus::Unauthenticated) {
            return GateTransition::Unchanged;
        }
        self.generation += 1;
        self.status = AuthStatus::Unauthenticated;
        self.restore_attempt = 0;
        info!(generation = self.generation, ?reason, "signed out");
        GateTransition::Unauthenticated { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Claims;

    fn gate() -> AuthGate {
        AuthGate::new(
            RestorePolicy {
                max_attempts: 3,
                base_delay_ms: 1_000,
            },
            StaleResponsePolicy::Discard,
            vec!["IAM-Admins".to_string()],
        )
    }

    fn identity(groups: &[&str]) -> Identity {
        Identity::from(Claims {
            name: Some("Ada".to_string()),
            groups: groups.iter().map(ToString::to_string).collect(),
            ..Claims::default()
        })
    }

    #[test]
    fn restore_without_session_goes_unauthenticated() {
        let mut gate = gate();
        let ticket = gate.initialize();
        assert_eq!(gate.status(), &AuthStatus::Loading);
        assert_eq!(
            gate.on_restore(ticket, Ok(None)),
            GateTransition::Unauthenticated {
                reason: SignedOutReason::NoSession
            }
        );
        assert!(gate.identity().is_none());
    }

    #[test]
    fn restore_retries_with_linear_backoff_then_gives_up() {
        let mut gate = gate();
        let first = gate.initialize();
        let GateTransition::Retry { ticket: second, delay } =
            gate.on_restore(first, Err(WidgetFailure::new("offline")))
        else {
            panic!("expected retry");
        };
        assert_eq!(second.attempt, 2);
        assert_eq!(delay, Duration::from_millis(1_000));

        let GateTransition::Retry { ticket: third, delay } =
            gate.on_restore(second, Err(WidgetFailure::new("offline")))
        else {
            panic!("expected retry");
        };
        assert_eq!(third.attempt, 3);
        assert_eq!(delay, Duration::from_millis(2_000));

        assert_eq!(
            gate.on_restore(third, Err(WidgetFailure::new("offline"))),
            GateTransition::Unauthenticated {
                reason: SignedOutReason::RestoreFailed
            }
        );
        assert_eq!(gate.restore_attempt(), 0);
    }

    #[test]
    fn restore_success_authenticates() {
        let mut gate = gate();
        let ticket = gate.initialize();
        assert_eq!(
            gate.on_restore(ticket, Ok(Some(identity(&["Everyone"])))),
            GateTransition::Authenticated { entered: true }
        );
        assert!(gate.is_authenticated());
        assert!(gate.has_group("Everyone"));
    }

    #[test]
    fn has_group_is_false_without_identity() {
        let mut gate = gate();
        assert!(!gate.has_group(""));
        assert!(!gate.has_group("IAM-Admins"));
        let ticket = gate.initialize();
        gate.on_restore(ticket, Ok(None));
        assert!(!gate.has_group("Everyone"));
    }

    #[test]
    fn stale_restore_after_sign_in_is_discarded() {
        let mut gate = gate();
        let ticket = gate.initialize();
        gate.sign_in(identity(&["Developers"]));
        assert_eq!(gate.on_restore(ticket, Ok(None)), GateTransition::Stale);
        assert!(gate.is_authenticated());
    }

    #[test]
    fn stale_restore_is_applied_under_apply_policy() {
        let mut gate = AuthGate::new(
            RestorePolicy::default(),
            StaleResponsePolicy::Apply,
            Vec::new(),
        );
        let ticket = gate.initialize();
        gate.sign_in(identity(&[]));
        assert_eq!(
            gate.on_restore(ticket, Ok(None)),
            GateTransition::Unauthenticated {
                reason: SignedOutReason::NoSession
            }
        );
    }

    #[test]
    fn revalidation_ticket_goes_stale_after_logout() {
        let mut gate = gate();
        gate.sign_in(identity(&[]));
        let ticket = gate.revalidation_ticket();
        assert!(ticket.is_some());
        gate.sign_out();
        assert_eq!(gate.revalidation_ticket(), None);
        if let Some(ticket) = ticket {
            assert_eq!(
                gate.on_revalidated(ticket, Ok(Some(identity(&[])))),
                GateTransition::Stale
            );
        }
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn refresh_keeps_generation_and_replaces_identity() {
        let mut gate = gate();
        gate.sign_in(identity(&["Everyone"]));
        let generation = gate.generation();
        let ticket = gate.revalidation_ticket().unwrap_or(Ticket {
            generation,
            attempt: 0,
        });
        assert_eq!(
            gate.on_revalidated(ticket, Ok(Some(identity(&["Developers"])))),
            GateTransition::Authenticated { entered: false }
        );
        assert_eq!(gate.generation(), generation);
        assert!(gate.has_group("Developers"));
        assert!(!gate.has_group("Everyone"));
    }

    #[test]
    fn sign_out_is_idempotent() {
        let mut gate = gate();
        gate.sign_in(identity(&[]));
        assert_eq!(
            gate.sign_out(),
            GateTransition::Unauthenticated {
                reason: SignedOutReason::LoggedOut
            }
        );
        let generation = gate.generation();
        assert_eq!(gate.sign_out(), GateTransition::Unchanged);
        assert_eq!(gate.expire(), GateTransition::Unchanged);
        assert_eq!(gate.generation(), generation);
    }

    #[test]
    fn logout_confirmation_for_elevated_groups() {
        let mut gate = gate();
        assert_eq!(gate.logout_decision(), LogoutDecision::NotSignedIn);
        gate.sign_in(identity(&["Everyone"]));
        assert_eq!(gate.logout_decision(), LogoutDecision::Proceed);
        gate.sign_in(identity(&["IAM-Admins"]));
        assert_eq!(gate.logout_decision(), LogoutDecision::Confirm);
    }
}
