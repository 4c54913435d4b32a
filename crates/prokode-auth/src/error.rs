//! Error types for the portal core.

use thiserror::Error;

/// Primary error type for portal operations.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Configuration field failed validation.
    #[error("invalid portal configuration")]
    InvalidConfig {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Configuration document could not be parsed.
    #[error("failed to parse portal configuration")]
    ConfigParse {
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// The sign-in widget constructor threw.
    #[error("sign-in widget could not be constructed")]
    WidgetConstruction {
        /// Detail reported by the widget.
        detail: String,
    },
    /// A widget call failed.
    #[error("sign-in widget call failed")]
    Widget {
        /// Operation identifier.
        operation: &'static str,
        /// Detail reported by the widget.
        detail: String,
    },
    /// An element from the page contract is missing.
    #[error("page element missing")]
    MissingElement {
        /// Element id that was looked up.
        id: &'static str,
    },
    /// A feature module failed to install.
    #[error("feature failed to install")]
    FeatureInstall {
        /// Feature name.
        feature: &'static str,
        /// Failure detail.
        detail: String,
    },
    /// Identity claims could not be decoded.
    #[error("identity claims could not be decoded")]
    ClaimsDecode {
        /// Failure detail.
        detail: String,
    },
}

/// Convenience alias for portal results.
pub type PortalResult<T> = Result<T, PortalError>;
