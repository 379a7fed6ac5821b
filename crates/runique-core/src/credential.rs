//! The session credential.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::InvalidInputError;
use crate::tokens::{AccessToken, RefreshToken};

/// The access/refresh token pair plus the user id identifying a session.
///
/// A credential is replaced wholesale on login and on refresh; it is never
/// mutated in place. All three string fields are guaranteed non-empty.
///
/// # Security
///
/// Token values are never exposed in Debug output.
///
/// # Example
///
/// ```
/// use runique_core::Credential;
///
/// let credential = Credential::new("access", "refresh", "user-1").unwrap();
/// assert_eq!(credential.user_id(), "user-1");
/// assert!(Credential::new("", "refresh", "user-1").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: AccessToken,
    refresh_token: RefreshToken,
    user_id: String,
    access_token_expiration: Option<i64>,
}

impl Credential {
    /// Create a credential, rejecting empty fields.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Result<Self, InvalidInputError> {
        let access_token = non_empty(access_token.into(), "accessToken")?;
        let refresh_token = non_empty(refresh_token.into(), "refreshToken")?;
        let user_id = non_empty(user_id.into(), "userId")?;

        Ok(Self {
            access_token: AccessToken::new(access_token),
            refresh_token: RefreshToken::new(refresh_token),
            user_id,
            access_token_expiration: None,
        })
    }

    /// Attach the access token's expiration, in milliseconds since the Unix
    /// epoch.
    pub fn with_expiration(mut self, expiration_millis: Option<i64>) -> Self {
        self.access_token_expiration = expiration_millis;
        self
    }

    /// Returns a new credential carrying a renewed access token.
    ///
    /// The user id is always preserved. The refresh token is preserved unless
    /// the server rotated it.
    pub fn renewed(
        &self,
        access_token: impl Into<String>,
        expiration_millis: Option<i64>,
        rotated_refresh_token: Option<String>,
    ) -> Result<Self, InvalidInputError> {
        let refresh_token = rotated_refresh_token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.refresh_token.as_str().to_string());

        Ok(Self::new(access_token, refresh_token, self.user_id.clone())?
            .with_expiration(expiration_millis))
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The raw expiration timestamp in milliseconds, if the server sent one.
    pub fn access_token_expiration(&self) -> Option<i64> {
        self.access_token_expiration
    }

    /// The access token's expiry as a UTC time.
    pub fn access_token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.access_token_expiration
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Whether the access token is known to have expired at `now`.
    ///
    /// A credential without an expiration is never considered expired; the
    /// server's 401 is the authority in that case.
    pub fn is_access_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_token_expires_at()
            .is_some_and(|expires_at| now >= expires_at)
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, InvalidInputError> {
    if value.is_empty() {
        Err(InvalidInputError::EmptyCredentialField { field })
    } else {
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("tokens", &"[REDACTED]")
            .field("access_token_expiration", &self.access_token_expiration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_each_empty_field() {
        assert_eq!(
            Credential::new("", "r", "u").unwrap_err(),
            InvalidInputError::EmptyCredentialField { field: "accessToken" }
        );
        assert_eq!(
            Credential::new("a", "", "u").unwrap_err(),
            InvalidInputError::EmptyCredentialField { field: "refreshToken" }
        );
        assert_eq!(
            Credential::new("a", "r", "").unwrap_err(),
            InvalidInputError::EmptyCredentialField { field: "userId" }
        );
    }

    #[test]
    fn renewed_replaces_only_access_token() {
        let original = Credential::new("a1", "r1", "u1").unwrap();
        let renewed = original.renewed("a2", Some(5_000), None).unwrap();

        assert_eq!(renewed.access_token().as_str(), "a2");
        assert_eq!(renewed.refresh_token().as_str(), "r1");
        assert_eq!(renewed.user_id(), "u1");
        assert_eq!(renewed.access_token_expiration(), Some(5_000));
    }

    #[test]
    fn renewed_accepts_rotated_refresh_token() {
        let original = Credential::new("a1", "r1", "u1").unwrap();
        let renewed = original
            .renewed("a2", None, Some("r2".to_string()))
            .unwrap();
        assert_eq!(renewed.refresh_token().as_str(), "r2");

        let blank_rotation = original.renewed("a2", None, Some(String::new())).unwrap();
        assert_eq!(blank_rotation.refresh_token().as_str(), "r1");
    }

    #[test]
    fn expiry_checks() {
        let credential = Credential::new("a", "r", "u")
            .unwrap()
            .with_expiration(Some(1_000));
        let before = DateTime::from_timestamp_millis(999).unwrap();
        let after = DateTime::from_timestamp_millis(1_000).unwrap();

        assert!(!credential.is_access_token_expired(before));
        assert!(credential.is_access_token_expired(after));

        let no_expiry = Credential::new("a", "r", "u").unwrap();
        assert!(!no_expiry.is_access_token_expired(after));
    }

    #[test]
    fn debug_hides_tokens() {
        let credential = Credential::new("secret-access", "secret-refresh", "u1").unwrap();
        let debug = format!("{:?}", credential);
        assert!(debug.contains("u1"));
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
