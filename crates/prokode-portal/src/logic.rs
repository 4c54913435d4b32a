//! Pure UI helpers extracted from the browser host for non-wasm testing.

use std::time::Duration;

use prokode_auth::{Claims, WidgetConfig, WidgetFailure, defaults};
use serde_json::{Map, Value, json};

/// Scroll offset, in CSS pixels, after which the header gains its shadow.
pub const HEADER_SHADOW_OFFSET: f64 = 8.0;
/// Minimum gap between forwarded activity events, in milliseconds.
pub const ACTIVITY_MIN_GAP_MS: f64 = 1_000.0;

/// Browser timer delay for `duration`, clamped to the range timers honour.
#[must_use]
pub fn timer_millis(duration: Duration) -> u32 {
    let clamped = duration.as_millis().min(u128::from(defaults::MAX_TIMER_MS));
    u32::try_from(clamped).unwrap_or(u32::MAX)
}

/// Semantic action for a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// Sign out (`Ctrl+Shift+L`).
    Logout,
    /// Close the mobile navigation (`Escape`).
    CloseNav,
}

/// Interpret a key press. Keys typed into editable fields are ignored,
/// except `Escape`.
#[must_use]
pub fn interpret_shortcut(
    key: &str,
    ctrl: bool,
    shift: bool,
    editable_target: bool,
) -> Option<ShortcutOutcome> {
    match key {
        "Escape" => Some(ShortcutOutcome::CloseNav),
        _ if editable_target => None,
        "l" | "L" if ctrl && shift => Some(ShortcutOutcome::Logout),
        _ => None,
    }
}

/// Whether an element with this tag name accepts typed input.
#[must_use]
pub fn is_editable_tag(tag_name: &str) -> bool {
    ["INPUT", "TEXTAREA", "SELECT"]
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(tag_name))
}

/// Whether the header shadow should be shown at `scroll_y`.
#[must_use]
pub fn header_scrolled(scroll_y: f64) -> bool {
    scroll_y > HEADER_SHADOW_OFFSET
}

/// Element id targeted by an in-page anchor, if `href` is one.
#[must_use]
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.trim().is_empty())
}

/// Drops activity events that arrive faster than [`ACTIVITY_MIN_GAP_MS`].
///
/// Pointer moves fire many times a second; re-arming the inactivity timer once
/// a second is enough.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActivityThrottle {
    last_ms: Option<f64>,
}

impl ActivityThrottle {
    /// Returns whether an event at `now_ms` should be forwarded.
    pub fn admit(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms
            && now_ms - last < ACTIVITY_MIN_GAP_MS
            && now_ms >= last
        {
            return false;
        }
        self.last_ms = Some(now_ms);
        true
    }
}

/// Options object handed to the widget constructor.
#[must_use]
pub fn widget_options(config: &WidgetConfig) -> Value {
    let mut help = Map::new();
    for (key, link) in [
        ("help", &config.help_links.help),
        ("forgotPassword", &config.help_links.forgot_password),
        ("unlock", &config.help_links.unlock),
    ] {
        if let Some(link) = link {
            help.insert(key.to_string(), Value::String(link.clone()));
        }
    }

    let mut options = json!({
        "baseUrl": config.base_url,
        "clientId": config.client_id,
        "redirectUri": config.redirect_uri,
        "i18n": { "en": { "primaryauth.title": format!("Sign in to {}", config.brand_name) } },
        "authParams": {
            "issuer": config.issuer,
            "scopes": config.scopes,
            "pkce": true,
        },
        "features": { "registration": false },
    });
    if let Some(object) = options.as_object_mut() {
        if let Some(logo) = &config.logo {
            object.insert("logo".to_string(), Value::String(logo.clone()));
        }
        if !help.is_empty() {
            object.insert("helpLinks".to_string(), Value::Object(help));
        }
    }
    options
}

/// Overlay userinfo claims on the ID-token claims they refresh.
///
/// Userinfo carries no token timestamps and may omit groups, so those stay
/// from the token when absent.
#[must_use]
pub fn merge_userinfo(token: Claims, userinfo: Claims) -> Claims {
    Claims {
        sub: userinfo.sub.or(token.sub),
        name: userinfo.name.or(token.name),
        preferred_username: userinfo.preferred_username.or(token.preferred_username),
        email: userinfo.email.or(token.email),
        groups: if userinfo.groups.is_empty() {
            token.groups
        } else {
            userinfo.groups
        },
        iat: token.iat,
        exp: token.exp,
    }
}

/// Build a failure from the loosely typed fields a widget error carries.
#[must_use]
pub fn failure_from_parts(code: Option<String>, message: Option<String>) -> WidgetFailure {
    let detail = message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "unknown widget error".to_string());
    match code.filter(|code| !code.trim().is_empty()) {
        Some(code) => WidgetFailure::with_code(code, detail),
        None => WidgetFailure::new(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_delays_clamp_to_browser_range() {
        assert_eq!(timer_millis(Duration::ZERO), 0);
        assert_eq!(timer_millis(Duration::from_secs(300)), 300_000);
        assert_eq!(timer_millis(Duration::from_secs(3_000_000)), 2_147_483_647);
        assert_eq!(timer_millis(Duration::MAX), 2_147_483_647);
    }

    #[test]
    fn shortcuts_cover_logout_and_escape() {
        assert_eq!(
            interpret_shortcut("L", true, true, false),
            Some(ShortcutOutcome::Logout)
        );
        assert_eq!(interpret_shortcut("l", true, false, false), None);
        assert_eq!(interpret_shortcut("l", true, true, true), None);
        assert_eq!(
            interpret_shortcut("Escape", false, false, true),
            Some(ShortcutOutcome::CloseNav)
        );
        assert!(interpret_shortcut("x", false, false, false).is_none());
    }

    #[test]
    fn editable_tags_are_case_insensitive() {
        assert!(is_editable_tag("input"));
        assert!(is_editable_tag("TEXTAREA"));
        assert!(!is_editable_tag("BUTTON"));
    }

    #[test]
    fn anchors_only_match_in_page_fragments() {
        assert_eq!(anchor_target("#services"), Some("services"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/about#team"), None);
        assert!(header_scrolled(40.0));
        assert!(!header_scrolled(0.0));
    }

    #[test]
    fn activity_throttle_admits_once_per_gap() {
        let mut throttle = ActivityThrottle::default();
        assert!(throttle.admit(0.0));
        assert!(!throttle.admit(400.0));
        assert!(throttle.admit(1_000.0));
        assert!(!throttle.admit(1_999.0));
        // a clock that moved backwards never blocks input
        assert!(throttle.admit(10.0));
    }

    #[test]
    fn widget_options_enable_pkce_and_skip_missing_links() {
        let mut config = WidgetConfig::default();
        config.help_links.forgot_password = Some("https://prokode.dev/reset".to_string());
        let options = widget_options(&config);

        assert_eq!(options["authParams"]["pkce"], Value::Bool(true));
        assert_eq!(options["clientId"], Value::String(config.client_id.clone()));
        assert_eq!(
            options["helpLinks"]["forgotPassword"],
            Value::String("https://prokode.dev/reset".to_string())
        );
        assert!(options["helpLinks"].get("help").is_none());
        assert!(options.get("logo").is_none());
        assert_eq!(
            options["authParams"]["scopes"][0],
            Value::String("openid".to_string())
        );
    }

    #[test]
    fn userinfo_refreshes_profile_but_keeps_token_expiry() {
        let token = Claims {
            name: Some("Ada".to_string()),
            groups: vec!["IAM-Admins".to_string()],
            exp: Some(1_700_003_600),
            ..Claims::default()
        };
        let userinfo = Claims {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@prokode.dev".to_string()),
            ..Claims::default()
        };
        let merged = merge_userinfo(token, userinfo);
        assert_eq!(merged.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(merged.groups, vec!["IAM-Admins".to_string()]);
        assert_eq!(merged.exp, Some(1_700_003_600));
    }

    #[test]
    fn failures_normalize_blank_fields() {
        let failure = failure_from_parts(Some(" ".to_string()), None);
        assert_eq!(failure.code, None);
        assert_eq!(failure.detail, "unknown widget error");

        let failure = failure_from_parts(
            Some("E0000004".to_string()),
            Some("Authentication failed".to_string()),
        );
        assert_eq!(failure.code.as_deref(), Some("E0000004"));
    }
}
