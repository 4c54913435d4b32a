//! Mapping of vendor sign-in error codes to user-facing messages.

/// Message shown when the widget reports an unknown failure.
pub const FALLBACK_MESSAGE: &str = "Sign-in failed. Please try again.";

/// Message shown on the login panel after a session was forced closed.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Human-readable message for a vendor error code.
///
/// Codes follow the identity provider's `E0000xxx` catalogue; the widget also
/// reports OAuth error names and transport failures.
#[must_use]
pub fn login_error_message(code: &str) -> &'static str {
    match code.trim() {
        "E0000004" | "invalid_grant" => "The username or password you entered is incorrect.",
        "E0000069" => "Your account is locked. Use the unlock link or contact IT support.",
        "E0000047" => "Too many sign-in attempts. Wait a minute and try again.",
        "E0000064" => "Your password has expired. Reset it to continue.",
        "E0000006" | "access_denied" => "You do not have access to this portal.",
        "E0000011" | "invalid_token" => "Your sign-in link is no longer valid. Start again.",
        "E0000068" | "E0000080" => "The verification code is invalid or has expired.",
        "E0000119" => "Your account is not yet activated. Check your email.",
        "login_required" | "interaction_required" => "Please sign in to continue.",
        "NetworkError" | "AuthApiError" => {
            "We could not reach the sign-in service. Check your connection."
        }
        _ => FALLBACK_MESSAGE,
    }
}
