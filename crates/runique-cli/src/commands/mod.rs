//! Subcommand implementations.

pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod request;
pub mod whoami;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use runique_core::{DataError, KeyValueSessionStore, NetworkError, SessionStore};
use runique_http::{ApiClient, ClientConfig};

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::session::FileKeyValueStore;
use crate::session::storage::default_data_dir;

pub async fn handle(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Register(args) => register::run(&global, args).await,
        Commands::Login(args) => login::run(&global, args).await,
        Commands::Logout(args) => logout::run(&global, args).await,
        Commands::Whoami(args) => whoami::run(&global, args).await,
        Commands::RefreshToken(args) => refresh_token::run(&global, args).await,
        Commands::Get(args) => request::get(&global, args).await,
        Commands::Delete(args) => request::delete(&global, args).await,
    }
}

impl GlobalArgs {
    /// The session store under the configured data directory.
    pub fn session_store(&self) -> Result<Arc<dyn SessionStore>> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        let kv = FileKeyValueStore::open(&dir)
            .with_context(|| format!("Failed to open session store in {}", dir.display()))?;
        Ok(Arc::new(KeyValueSessionStore::new(kv)))
    }

    /// Client configuration from the base URL and API key options.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .clone()
            .context("No base URL. Pass --base-url or set RUNIQUE_BASE_URL.")?;
        let api_key = self
            .api_key
            .as_deref()
            .context("No API key. Pass --api-key or set RUNIQUE_API_KEY.")?;

        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        Ok(ClientConfig::new(base_url, api_key).with_timeout(timeout))
    }

    /// An authenticated client backed by `store`.
    pub fn client(&self, store: &Arc<dyn SessionStore>) -> Result<ApiClient> {
        ApiClient::authenticated(self.client_config()?, Arc::clone(store))
            .context("Failed to build HTTP client")
    }
}

/// Describe a failed request for a user, treating an unrecoverable 401 as an
/// expired session.
pub fn describe_request_error(err: NetworkError) -> &'static str {
    match err {
        NetworkError::Unauthorized => "Your session has expired. Log in again.",
        other => DataError::from(other).user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(base_url: Option<&str>, api_key: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            base_url: base_url.map(|b| b.parse().unwrap()),
            api_key: api_key.map(str::to_string),
            timeout_secs: 0,
            data_dir: None,
            verbose: 0,
            json_logs: false,
        }
    }

    #[test]
    fn client_config_requires_base_url_and_api_key() {
        assert!(global(None, Some("key")).client_config().is_err());
        assert!(global(Some("https://api.runique.dev"), None).client_config().is_err());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = global(Some("https://api.runique.dev"), Some("key"))
            .client_config()
            .unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn unauthorized_reads_as_expired_session() {
        assert_eq!(
            describe_request_error(NetworkError::Unauthorized),
            "Your session has expired. Log in again."
        );
        assert_eq!(
            describe_request_error(NetworkError::NoInternet),
            DataError::from(NetworkError::NoInternet).user_message()
        );
    }
}
