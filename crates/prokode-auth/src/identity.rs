//! Identity claims returned by the identity provider.
//!
//! # Design
//! - `Claims` mirrors the provider payload loosely; unknown fields are ignored.
//! - `Identity` is immutable once built and replaced wholesale on refresh.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{PortalError, PortalResult};

/// Raw claims as emitted by the ID token or the userinfo endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Subject identifier.
    #[serde(default)]
    pub sub: Option<String>,
    /// Full display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login name.
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Group memberships.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Issued-at, seconds since the epoch.
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiry, seconds since the epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    /// Parse claims from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ClaimsDecode`] when the payload is not a claims object.
    pub fn from_json(raw: &str) -> PortalResult<Self> {
        serde_json::from_str(raw).map_err(|err| PortalError::ClaimsDecode {
            detail: err.to_string(),
        })
    }

    /// Decode the payload segment of a compact JWT without verifying it.
    ///
    /// Signature checks belong to the widget; this only reads what it already accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ClaimsDecode`] for malformed tokens.
    pub fn from_id_token(token: &str) -> PortalResult<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if !payload.is_empty() => payload,
            _ => {
                return Err(PortalError::ClaimsDecode {
                    detail: "token is not a compact JWT".to_string(),
                });
            }
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|err| PortalError::ClaimsDecode {
                detail: err.to_string(),
            })?;
        serde_json::from_slice(&bytes).map_err(|err| PortalError::ClaimsDecode {
            detail: err.to_string(),
        })
    }
}

/// Signed-in principal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Full display name, if issued.
    pub name: Option<String>,
    /// Login name, if issued.
    pub username: Option<String>,
    /// Email address, if issued.
    pub email: Option<String>,
    /// Group memberships in issue order.
    pub groups: Vec<String>,
    /// When the token was issued.
    pub issued_at: Option<DateTime<Utc>>,
    /// When the token expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            name: non_blank(claims.name),
            username: non_blank(claims.preferred_username),
            email: non_blank(claims.email),
            groups: claims
                .groups
                .into_iter()
                .filter(|group| !group.trim().is_empty())
                .collect(),
            issued_at: claims.iat.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            expires_at: claims.exp.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }
}

impl Identity {
    /// Name shown in the header: name, then username, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("User")
    }

    /// Up to two uppercase initials derived from the display name.
    #[must_use]
    pub fn initials(&self) -> String {
        self.display_name()
            .split(|c: char| c.is_whitespace() || c == '.' || c == '@')
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Whether the identity belongs to `group`. The empty name never matches.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        !group.is_empty() && self.groups.iter().any(|candidate| candidate == group)
    }

    /// Whether the token expiry has passed at `now`. Identities without expiry never expire locally.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn claims_decode_from_id_token() -> PortalResult<()> {
        let token = jwt(
            r#"{"sub":"00u1","name":"Ada Lovelace","email":"ada@prokode.dev","groups":["IAM-Admins","Everyone"],"iat":1700000000,"exp":1700003600}"#,
        );
        let identity = Identity::from(Claims::from_id_token(&token)?);
        assert_eq!(identity.display_name(), "Ada Lovelace");
        assert!(identity.has_group("IAM-Admins"));
        assert_eq!(
            identity.expires_at,
            DateTime::from_timestamp(1_700_003_600, 0)
        );
        Ok(())
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(Claims::from_id_token("not-a-jwt").is_err());
        assert!(Claims::from_id_token("a..c").is_err());
        assert!(Claims::from_id_token("a.!!!.c").is_err());
    }

    #[test]
    fn display_name_falls_back() -> PortalResult<()> {
        let identity = Identity::from(Claims::from_json(
            r#"{"name":"  ","preferred_username":"grace@prokode.dev"}"#,
        )?);
        assert_eq!(identity.display_name(), "grace@prokode.dev");
        assert_eq!(identity.initials(), "GP");
        assert_eq!(Identity::from(Claims::default()).display_name(), "User");
        Ok(())
    }

    #[test]
    fn empty_group_name_never_matches() {
        let identity = Identity::from(Claims {
            groups: vec![String::new(), "Developers".to_string()],
            ..Claims::default()
        });
        assert!(!identity.has_group(""));
        assert!(identity.has_group("Developers"));
        assert_eq!(identity.groups, vec!["Developers".to_string()]);
    }

    #[test]
    fn expiry_is_inclusive() {
        let identity = Identity::from(Claims {
            exp: Some(100),
            ..Claims::default()
        });
        let at = |secs| DateTime::from_timestamp(secs, 0).unwrap_or_default();
        assert!(!identity.is_expired(at(99)));
        assert!(identity.is_expired(at(100)));
        assert!(!Identity::from(Claims::default()).is_expired(at(i64::from(i32::MAX))));
    }
}
