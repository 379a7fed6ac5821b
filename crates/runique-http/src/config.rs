//! Client configuration.

use std::fmt;
use std::time::Duration;

use runique_core::BaseUrl;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for building an [`ApiClient`](crate::ApiClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Address relative routes are joined onto.
    pub base_url: BaseUrl,
    /// Value sent in the `x-api-key` header of every request.
    pub api_key: String,
    /// Per-request timeout. `None` disables it.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: BaseUrl, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: concat!("runique/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
