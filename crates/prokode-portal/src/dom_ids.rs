//! Element ids the host page must provide.
//!
//! A missing element only disables the piece that needs it.

/// Overlay wrapping the sign-in form.
pub const LOGIN_OVERLAY: &str = "login-overlay";
/// Container the widget renders its form into.
pub const SIGNIN_CONTAINER: &str = "okta-signin-container";
/// Mount point for the login status panel.
pub const LOGIN_STATUS: &str = "login-status";
/// Content shown only to signed-in users.
pub const PROTECTED_CONTENT: &str = "protected-content";
/// Signed-in user's display name.
pub const USER_NAME: &str = "user-name";
/// Logout button.
pub const LOGOUT_BUTTON: &str = "logout-btn";
/// Status bar receiving role badges.
pub const STATUS_BAR: &str = "status-bar";
/// Role label inside the status bar.
pub const ROLE_LABEL: &str = "role-label";
/// Grid receiving resource cards.
pub const RESOURCE_GRID: &str = "resource-grid";

/// Site header that gains a shadow once scrolled.
pub const SITE_HEADER: &str = "site-header";
/// Mobile navigation toggle button.
pub const NAV_TOGGLE: &str = "nav-toggle";
/// Navigation list opened by the toggle.
pub const SITE_NAV: &str = "site-nav";

/// Selector for elements animated in when scrolled into view.
pub const REVEAL_SELECTOR: &str = ".reveal";
/// Selector for images whose source is deferred.
pub const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
