//! API base URL type.

use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::InvalidInputError;

/// A validated API base URL.
///
/// The URL must be absolute and use HTTPS (HTTP is accepted only for
/// localhost). Relative routes are joined onto it with [`BaseUrl::route`].
///
/// # Example
///
/// ```
/// use runique_core::BaseUrl;
///
/// let base = BaseUrl::new("https://api.runique.dev/").unwrap();
/// assert_eq!(base.route("/login"), "https://api.runique.dev/login");
/// assert_eq!(base.route("register"), "https://api.runique.dev/register");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl {
    prefix: String,
}

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, InvalidInputError> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::BaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // The url crate keeps a trailing slash on root paths; routes are
        // joined against the slash-free form.
        let prefix = url.as_str().trim_end_matches('/').to_string();

        Ok(Self { prefix })
    }

    /// Resolve a route against this base.
    ///
    /// Routes that already contain the base address, or carry their own
    /// `http://`/`https://` scheme, are returned verbatim.
    pub fn route(&self, route: &str) -> String {
        if route.contains(&self.prefix)
            || route.starts_with("http://")
            || route.starts_with("https://")
        {
            route.to_string()
        } else if route.starts_with('/') {
            format!("{}{}", self.prefix, route)
        } else {
            format!("{}/{}", self.prefix, route)
        }
    }

    /// Returns the base URL without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    fn validate(url: &Url, original: &str) -> Result<(), InvalidInputError> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            });
        }

        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            });
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            });
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must not carry a query or fragment".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}

impl FromStr for BaseUrl {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
