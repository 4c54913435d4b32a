//! Identity fixtures.

use chrono::{DateTime, Utc};
use prokode_auth::{Claims, Identity};

/// Identity named "Ada Lovelace" with the given groups and no expiry.
#[must_use]
pub fn identity(groups: &[&str]) -> Identity {
    Identity::from(Claims {
        sub: Some("00u-ada".to_string()),
        name: Some("Ada Lovelace".to_string()),
        preferred_username: Some("ada@prokode.dev".to_string()),
        email: Some("ada@prokode.dev".to_string()),
        groups: groups.iter().map(ToString::to_string).collect(),
        iat: None,
        exp: None,
    })
}

/// Identity in the default elevated group.
#[must_use]
pub fn admin_identity() -> Identity {
    identity(&["IAM-Admins"])
}

/// Identity whose token expires at `exp` seconds since the epoch.
#[must_use]
pub fn identity_expiring_at(groups: &[&str], exp: i64) -> Identity {
    Identity::from(Claims {
        name: Some("Grace Hopper".to_string()),
        groups: groups.iter().map(ToString::to_string).collect(),
        iat: Some(exp - 3_600),
        exp: Some(exp),
        ..Claims::default()
    })
}

/// Timestamp `secs` seconds after the epoch (the epoch itself when out of range).
#[must_use]
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
