//! Default values used when no configuration document is available.
//!
//! # Design
//! - Centralize timing and retry constants so the gate and monitor agree.
//! - Keep the fallback widget settings usable against a development org.

/// Interval between periodic session re-validations, in seconds.
pub const REVALIDATE_INTERVAL_SECS: u64 = 5 * 60;
/// Inactivity window before a re-validation is forced, in seconds.
pub const INACTIVITY_TIMEOUT_SECS: u64 = 30 * 60;
/// Longest delay browsers accept for a timer (`i32::MAX` ms); larger values fire at once.
pub const MAX_TIMER_MS: u64 = 2_147_483_647;
/// Number of attempts made to resolve an existing session on load.
pub const RESTORE_MAX_ATTEMPTS: u32 = 3;
/// Base delay between restore attempts; attempt `n` waits `(n - 1) * base`.
pub const RESTORE_BASE_DELAY_MS: u64 = 1_000;
/// Group whose members must confirm logout.
pub const ADMIN_GROUP: &str = "IAM-Admins";
/// Default identity provider issuer.
pub const ISSUER: &str = "https://prokode.okta.com/oauth2/default";
/// Default identity provider org URL (widget base URL).
pub const BASE_URL: &str = "https://prokode.okta.com";
/// Default OIDC client id for the portal.
pub const CLIENT_ID: &str = "0oa-prokode-portal";
/// Default redirect URI after sign-in.
pub const REDIRECT_URI: &str = "http://localhost:8080/";
/// Default scopes requested at sign-in.
pub const SCOPES: [&str; 4] = ["openid", "profile", "email", "groups"];
/// Brand name shown on the widget.
pub const BRAND_NAME: &str = "Prokode Labs";
/// Default log level for the browser console.
pub const LOG_LEVEL: &str = "info";
/// Relative URL of the runtime configuration document.
pub const CONFIG_URL: &str = "portal-config.json";
