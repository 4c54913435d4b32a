#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! DOM-free authentication core for the Prokode portal.
//!
//! Layout: `gate.rs` (auth state machine), `monitor.rs` (session timers and
//! triggers), `features.rs` (post-login feature registry), `roles.rs` (group
//! projection), `portal.rs` (the owned context wiring them together),
//! `config.rs`/`defaults.rs` (typed configuration), `identity.rs` (claims).
//!
//! Every transition is synchronous. Widget calls are described as
//! [`portal::WidgetRequest`] values for the browser host to execute, and their
//! results come back as [`portal::PortalEvent`]s.

pub mod capability;
pub mod config;
pub mod defaults;
pub mod error;
pub mod features;
pub mod gate;
pub mod identity;
pub mod login_errors;
pub mod monitor;
pub mod portal;
pub mod roles;

pub use capability::AuthCapabilities;
pub use config::{
    CardRule, HelpLinks, PortalConfig, RestorePolicy, RolePolicy, RoleRule, RuntimeOverrides,
    SessionPolicy, StaleResponsePolicy, WidgetConfig,
};
pub use error::{PortalError, PortalResult};
pub use features::{Feature, FeatureRegistry};
pub use gate::{
    AuthGate, AuthStatus, GateTransition, LogoutDecision, SignedOutReason, Ticket, WidgetFailure,
    WidgetOutcome,
};
pub use identity::{Claims, Identity};
pub use monitor::{ACTIVITY_EVENTS, Scheduler, SessionMonitor, SessionTrigger};
pub use portal::{PageView, Portal, PortalEvent, WidgetRequest};
pub use roles::{Badge, ResourceCard, RoleProjection, RoleProjector, RoleSurface};
