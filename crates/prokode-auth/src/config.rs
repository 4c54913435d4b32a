//! Typed portal configuration with layered overrides.
//!
//! # Design
//! - Defaults are always valid so a failed fetch can fall back silently.
//! - The JSON document may be partial; missing fields keep their defaults.
//! - Runtime overrides ignore blank strings so static hosts can leave
//!   placeholders in place.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{PortalError, PortalResult};

/// Accepted values for [`PortalConfig::log_level`].
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Complete portal configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Sign-in widget settings.
    pub widget: WidgetConfig,
    /// Session monitoring policy.
    pub session: SessionPolicy,
    /// Session restore retry policy.
    pub restore: RestorePolicy,
    /// Group-to-presentation rules.
    pub roles: RolePolicy,
    /// Console log level (`trace`, `debug`, `info`, `warn`, `error`).
    pub log_level: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            widget: WidgetConfig::default(),
            session: SessionPolicy::default(),
            restore: RestorePolicy::default(),
            roles: RolePolicy::default(),
            log_level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl PortalConfig {
    /// Parse a (possibly partial) JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ConfigParse`] when the document is not valid JSON
    /// for this schema, or the validation error from [`Self::validate`].
    pub fn from_json(raw: &str) -> PortalResult<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|source| PortalError::ConfigParse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the gate and monitor rely on.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> PortalResult<()> {
        if self.widget.issuer.trim().is_empty() {
            return Err(invalid("widget.issuer", "empty"));
        }
        if !is_secure_url(&self.widget.issuer) {
            return Err(invalid("widget.issuer", "https required"));
        }
        if self.widget.client_id.trim().is_empty() {
            return Err(invalid("widget.client_id", "empty"));
        }
        if !self.widget.scopes.iter().any(|scope| scope == "openid") {
            return Err(invalid("widget.scopes", "openid scope missing"));
        }
        if self.session.revalidate_interval_secs == 0 {
            return Err(invalid("session.revalidate_interval_secs", "zero"));
        }
        if exceeds_timer_range(self.session.revalidate_interval()) {
            return Err(invalid(
                "session.revalidate_interval_secs",
                "exceeds browser timer range",
            ));
        }
        if self.session.inactivity_timeout_secs == 0 {
            return Err(invalid("session.inactivity_timeout_secs", "zero"));
        }
        if exceeds_timer_range(self.session.inactivity_timeout()) {
            return Err(invalid(
                "session.inactivity_timeout_secs",
                "exceeds browser timer range",
            ));
        }
        if self.restore.max_attempts == 0 {
            return Err(invalid("restore.max_attempts", "zero"));
        }
        if exceeds_timer_range(self.restore.delay_before(self.restore.max_attempts)) {
            return Err(invalid(
                "restore.base_delay_ms",
                "exceeds browser timer range",
            ));
        }
        if self.roles.rules.iter().any(|rule| rule.group.trim().is_empty()) {
            return Err(invalid("roles.rules.group", "empty"));
        }
        if !LOG_LEVELS
            .iter()
            .any(|level| level.eq_ignore_ascii_case(self.log_level.trim()))
        {
            return Err(invalid("log_level", "unknown level"));
        }
        Ok(())
    }

    /// Apply runtime overrides, skipping blank values.
    pub fn apply_overrides(&mut self, overrides: RuntimeOverrides) {
        if let Some(value) = overrides.issuer.as_deref().and_then(normalize_runtime_value) {
            self.widget.issuer = value;
        }
        if let Some(value) = overrides.base_url.as_deref().and_then(normalize_runtime_value) {
            self.widget.base_url = value;
        }
        if let Some(value) = overrides.client_id.as_deref().and_then(normalize_runtime_value) {
            self.widget.client_id = value;
        }
        if let Some(value) = overrides
            .redirect_uri
            .as_deref()
            .and_then(normalize_runtime_value)
        {
            self.widget.redirect_uri = value;
        }
        if let Some(value) = overrides.log_level.as_deref().and_then(normalize_runtime_value) {
            self.log_level = value;
        }
    }
}

/// Values read from `window.PROKODE_CONFIG` at boot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeOverrides {
    /// Issuer override.
    pub issuer: Option<String>,
    /// Org base URL override.
    pub base_url: Option<String>,
    /// Client id override.
    pub client_id: Option<String>,
    /// Redirect URI override.
    pub redirect_uri: Option<String>,
    /// Log level override.
    pub log_level: Option<String>,
}

/// Sign-in widget settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// OIDC issuer URL.
    pub issuer: String,
    /// Identity provider org URL.
    pub base_url: String,
    /// OIDC client id.
    pub client_id: String,
    /// Redirect URI registered for the client.
    pub redirect_uri: String,
    /// Scopes requested at sign-in.
    pub scopes: Vec<String>,
    /// Brand name rendered by the widget.
    pub brand_name: String,
    /// Optional logo URL.
    pub logo: Option<String>,
    /// Help links rendered under the form.
    pub help_links: HelpLinks,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            issuer: defaults::ISSUER.to_string(),
            base_url: defaults::BASE_URL.to_string(),
            client_id: defaults::CLIENT_ID.to_string(),
            redirect_uri: defaults::REDIRECT_URI.to_string(),
            scopes: defaults::SCOPES.iter().map(ToString::to_string).collect(),
            brand_name: defaults::BRAND_NAME.to_string(),
            logo: None,
            help_links: HelpLinks::default(),
        }
    }
}

/// Help links shown by the widget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpLinks {
    /// General help page.
    pub help: Option<String>,
    /// Forgot-password page.
    pub forgot_password: Option<String>,
    /// Account unlock page.
    pub unlock: Option<String>,
}

/// How responses tagged with an outdated ticket are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Drop responses issued before the latest transition.
    #[default]
    Discard,
    /// Apply responses to whatever state is current.
    Apply,
}

/// Session monitoring policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Seconds between periodic re-validations.
    pub revalidate_interval_secs: u64,
    /// Seconds without input before a re-validation is forced.
    pub inactivity_timeout_secs: u64,
    /// Treatment of responses that arrive after a newer transition.
    pub stale_responses: StaleResponsePolicy,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            revalidate_interval_secs: defaults::REVALIDATE_INTERVAL_SECS,
            inactivity_timeout_secs: defaults::INACTIVITY_TIMEOUT_SECS,
            stale_responses: StaleResponsePolicy::Discard,
        }
    }
}

impl SessionPolicy {
    /// Periodic re-validation interval.
    #[must_use]
    pub const fn revalidate_interval(&self) -> Duration {
        Duration::from_secs(self.revalidate_interval_secs)
    }

    /// Inactivity timeout.
    #[must_use]
    pub const fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }
}

/// Retry policy for resolving an existing session on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestorePolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Linear backoff step in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for RestorePolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::RESTORE_MAX_ATTEMPTS,
            base_delay_ms: defaults::RESTORE_BASE_DELAY_MS,
        }
    }
}

impl RestorePolicy {
    /// Delay before the given attempt (1-based). The first attempt runs immediately.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let steps = u64::from(attempt.saturating_sub(1));
        Duration::from_millis(self.base_delay_ms.saturating_mul(steps))
    }
}

/// Group presentation rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePolicy {
    /// Rules in priority order; the first match names the role label.
    pub rules: Vec<RoleRule>,
    /// Groups that must confirm before logging out.
    pub elevated_groups: Vec<String>,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                RoleRule {
                    group: defaults::ADMIN_GROUP.to_string(),
                    label: "Administrator".to_string(),
                    badge: Some("Admin".to_string()),
                    cards: vec![
                        CardRule {
                            title: "Admin Console".to_string(),
                            description: "Manage applications, policies and sign-on rules."
                                .to_string(),
                            href: "https://prokode-admin.okta.com".to_string(),
                        },
                        CardRule {
                            title: "User Directory".to_string(),
                            description: "Review people, groups and access requests."
                                .to_string(),
                            href: "https://prokode-admin.okta.com/admin/users".to_string(),
                        },
                    ],
                },
                RoleRule {
                    group: "Developers".to_string(),
                    label: "Developer".to_string(),
                    badge: Some("Dev".to_string()),
                    cards: vec![CardRule {
                        title: "API Reference".to_string(),
                        description: "Internal service catalogue and API docs.".to_string(),
                        href: "/docs/api".to_string(),
                    }],
                },
                RoleRule {
                    group: "Managers".to_string(),
                    label: "Manager".to_string(),
                    badge: None,
                    cards: vec![CardRule {
                        title: "Team Reports".to_string(),
                        description: "Headcount and project status dashboards.".to_string(),
                        href: "/reports".to_string(),
                    }],
                },
                RoleRule {
                    group: "Everyone".to_string(),
                    label: "Member".to_string(),
                    badge: None,
                    cards: Vec::new(),
                },
            ],
            elevated_groups: vec![defaults::ADMIN_GROUP.to_string()],
        }
    }
}

/// One group rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    /// Group name as issued in the `groups` claim (case-sensitive).
    pub group: String,
    /// Display label for the status bar.
    pub label: String,
    /// Badge text, if members get a badge.
    #[serde(default)]
    pub badge: Option<String>,
    /// Resource cards unlocked for members.
    #[serde(default)]
    pub cards: Vec<CardRule>,
}

/// Resource card definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRule {
    /// Card heading.
    pub title: String,
    /// Card body text.
    pub description: String,
    /// Link target.
    pub href: String,
}

/// Trim a runtime value, rejecting blanks.
#[must_use]
pub fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Hosts allowed to serve the issuer over plain http.
const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

fn is_secure_url(url: &str) -> bool {
    let Some((scheme, rest)) = url.trim().split_once("://") else {
        return false;
    };
    if scheme.eq_ignore_ascii_case("https") {
        return true;
    }
    scheme.eq_ignore_ascii_case("http")
        && url_host(rest).is_some_and(|host| {
            LOOPBACK_HOSTS
                .iter()
                .any(|loopback| loopback.eq_ignore_ascii_case(host))
        })
}

/// Host part of a URL with the scheme already stripped, port excluded.
fn url_host(rest: &str) -> Option<&str> {
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = if authority.starts_with('[') {
        authority.find(']').map(|end| &authority[..=end])?
    } else {
        authority.split(':').next()?
    };
    (!host.is_empty()).then_some(host)
}

fn exceeds_timer_range(duration: Duration) -> bool {
    duration.as_millis() > u128::from(defaults::MAX_TIMER_MS)
}

const fn invalid(field: &'static str, reason: &'static str) -> PortalError {
    PortalError::InvalidConfig { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PortalConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_document_keeps_defaults() -> PortalResult<()> {
        let config = PortalConfig::from_json(
            r#"{"widget":{"client_id":"0oa-custom"},"session":{"revalidate_interval_secs":60}}"#,
        )?;
        assert_eq!(config.widget.client_id, "0oa-custom");
        assert_eq!(config.widget.issuer, defaults::ISSUER);
        assert_eq!(config.session.revalidate_interval(), Duration::from_secs(60));
        assert_eq!(
            config.session.inactivity_timeout(),
            Duration::from_secs(defaults::INACTIVITY_TIMEOUT_SECS)
        );
        assert_eq!(config.restore, RestorePolicy::default());
        Ok(())
    }

    #[test]
    fn stale_policy_parses_snake_case() -> PortalResult<()> {
        let config = PortalConfig::from_json(r#"{"session":{"stale_responses":"apply"}}"#)?;
        assert_eq!(config.session.stale_responses, StaleResponsePolicy::Apply);
        Ok(())
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = PortalConfig::from_json("{not json").err();
        assert!(matches!(err, Some(PortalError::ConfigParse { .. })));
    }

    #[test]
    fn validation_rejects_insecure_issuer_and_zero_values() {
        let mut config = PortalConfig::default();
        config.widget.issuer = "http://idp.example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(PortalError::InvalidConfig {
                field: "widget.issuer",
                ..
            })
        ));

        for issuer in [
            "http://localhost.attacker.example/oauth2/default",
            "http://127.0.0.1.nip.io/oauth2/default",
            "http://localhost@idp.example.com/oauth2/default",
            "ftp://localhost/oauth2/default",
            "localhost:9000",
        ] {
            let mut config = PortalConfig::default();
            config.widget.issuer = issuer.to_string();
            assert!(
                matches!(
                    config.validate(),
                    Err(PortalError::InvalidConfig {
                        field: "widget.issuer",
                        ..
                    })
                ),
                "{issuer} should be rejected"
            );
        }

        for issuer in [
            "http://localhost:9000/oauth2/default",
            "http://localhost",
            "http://127.0.0.1:8080/oauth2/default",
            "http://[::1]:8080/oauth2/default",
            "HTTPS://idp.example.com/oauth2/default",
        ] {
            let mut config = PortalConfig::default();
            config.widget.issuer = issuer.to_string();
            assert!(config.validate().is_ok(), "{issuer} should be accepted");
        }

        let mut config = PortalConfig::default();
        config.restore.max_attempts = 0;
        assert!(matches!(
            config.validate(),
            Err(PortalError::InvalidConfig {
                field: "restore.max_attempts",
                ..
            })
        ));

        let mut config = PortalConfig::default();
        config.widget.scopes = vec!["profile".to_string()];
        assert!(config.validate().is_err());

        let mut config = PortalConfig::default();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_durations_beyond_timer_range() {
        let mut config = PortalConfig::default();
        config.session.revalidate_interval_secs = 3_000_000;
        assert!(matches!(
            config.validate(),
            Err(PortalError::InvalidConfig {
                field: "session.revalidate_interval_secs",
                ..
            })
        ));

        let mut config = PortalConfig::default();
        config.session.inactivity_timeout_secs = u64::MAX;
        assert!(matches!(
            config.validate(),
            Err(PortalError::InvalidConfig {
                field: "session.inactivity_timeout_secs",
                ..
            })
        ));

        let mut config = PortalConfig::default();
        config.restore = RestorePolicy {
            max_attempts: 3,
            base_delay_ms: defaults::MAX_TIMER_MS,
        };
        assert!(matches!(
            config.validate(),
            Err(PortalError::InvalidConfig {
                field: "restore.base_delay_ms",
                ..
            })
        ));

        let mut config = PortalConfig::default();
        config.session.revalidate_interval_secs = defaults::MAX_TIMER_MS / 1_000;
        config.restore = RestorePolicy {
            max_attempts: 2,
            base_delay_ms: defaults::MAX_TIMER_MS,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn restore_delay_grows_linearly() {
        let policy = RestorePolicy {
            max_attempts: 3,
            base_delay_ms: 500,
        };
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(500));
        assert_eq!(policy.delay_before(3), Duration::from_millis(1_000));
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  0oa-runtime "),
            Some("0oa-runtime".to_string())
        );
    }

    #[test]
    fn overrides_skip_blank_values() {
        let mut config = PortalConfig::default();
        config.apply_overrides(RuntimeOverrides {
            issuer: Some("  ".to_string()),
            client_id: Some("0oa-runtime".to_string()),
            log_level: Some("debug".to_string()),
            ..RuntimeOverrides::default()
        });
        assert_eq!(config.widget.issuer, defaults::ISSUER);
        assert_eq!(config.widget.client_id, "0oa-runtime");
        assert_eq!(config.log_level, "debug");
    }
}
