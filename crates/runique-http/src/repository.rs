//! Account operations: register, login, logout.

use std::sync::Arc;

use serde::de::IgnoredAny;
use tracing::{info, instrument, warn};

use runique_core::{
    Credential, DataError, EmptyResult, LocalError, NetworkError, ResultExt, SessionStore,
};

use crate::client::ApiClient;
use crate::endpoints::{EmailPasswordRequest, LOGIN_ROUTE, LoginResponse, REGISTER_ROUTE};

/// Domain-facing account operations.
///
/// Register and login go out without a bearer token: they are how a session
/// starts, so a stale stored credential must not trigger a refresh for them.
#[derive(Clone)]
pub struct AuthRepository {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
}

impl AuthRepository {
    pub fn new(client: &ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client: client.without_authenticator(),
            store,
        }
    }

    /// Create an account.
    ///
    /// [`NetworkError::Conflict`] means an account with this email already
    /// exists.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> EmptyResult<NetworkError> {
        info!("Registering account");
        self.client
            .post::<_, IgnoredAny>(REGISTER_ROUTE, &EmailPasswordRequest { email, password })
            .await
            .as_empty()
    }

    /// Log in and store the resulting credential.
    ///
    /// The credential is stored before this returns, so the next
    /// authenticated request already carries it. On failure the store is
    /// left untouched. [`NetworkError::Unauthorized`] means the email or
    /// password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> EmptyResult<DataError> {
        info!("Logging in");

        let response: LoginResponse = self
            .client
            .post(LOGIN_ROUTE, &EmailPasswordRequest { email, password })
            .await?;

        let credential = Credential::new(
            response.access_token,
            response.refresh_token,
            response.user_id,
        )
        .map_err(|e| {
            warn!(error = %e, "Login response carried an unusable credential");
            NetworkError::Serialization
        })?
        .with_expiration(Some(response.access_token_expiration_timestamp));

        let user_id = credential.user_id().to_string();
        self.store.set(credential).await?;

        info!(%user_id, "Logged in");
        Ok(())
    }

    /// Forget the stored credential.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> EmptyResult<LocalError> {
        self.store.clear().await?;
        info!("Logged out");
        Ok(())
    }
}

impl std::fmt::Debug for AuthRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRepository")
            .field("base_url", self.client.base_url())
            .finish()
    }
}
