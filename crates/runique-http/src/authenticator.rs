//! Bearer credential supply and single-flight refresh.

use std::fmt;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use runique_core::{AccessToken, Credential, SessionStore};

use crate::client::ApiClient;
use crate::endpoints::{ACCESS_TOKEN_ROUTE, AccessTokenRequest, AccessTokenResponse};

/// A refresh that every concurrent caller awaits. Resolves to the renewed
/// credential, or `None` if the refresh failed.
type PendingRefresh = Shared<BoxFuture<'static, Option<Credential>>>;

/// Supplies bearer credentials from a [`SessionStore`] and renews them when
/// the server rejects them.
///
/// At most one token exchange is in flight per authenticator. Callers that
/// hit a 401 while an exchange is running join it instead of starting their
/// own. The exchange runs on its own task, so a caller that gives up waiting
/// does not cancel it for the others.
pub struct TokenAuthenticator {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    in_flight: Arc<Mutex<Option<PendingRefresh>>>,
}

impl TokenAuthenticator {
    /// `client` is used for the token exchange and never sends a bearer
    /// token itself.
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client: client.without_authenticator(),
            store,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// The credential to attach to an outgoing request, if any.
    pub async fn supply(&self) -> Option<Credential> {
        self.store.get().await
    }

    /// Renew the credential after the server rejected `rejected`.
    ///
    /// Returns the credential to retry with, or `None` if it could not be
    /// renewed. If the stored access token already differs from `rejected`,
    /// another caller renewed it in the meantime and the stored credential is
    /// returned without a new exchange.
    #[instrument(skip_all)]
    pub async fn refresh(&self, rejected: Option<&AccessToken>) -> Option<Credential> {
        let pending = {
            let mut slot = self.in_flight.lock().await;
            if let Some(pending) = slot.clone() {
                debug!("Joining in-flight token refresh");
                pending
            } else {
                let Some(current) = self.store.get().await else {
                    debug!("No stored credential to refresh");
                    return None;
                };
                if Some(current.access_token()) != rejected {
                    debug!("Access token was renewed by another request");
                    return Some(current);
                }
                let pending = self.spawn_exchange(current);
                *slot = Some(pending.clone());
                pending
            }
        };

        pending.await
    }

    /// Start the token exchange on its own task.
    ///
    /// The exchange itself runs on an inner task so that a panic in it (or in
    /// the store) still reaches the code that clears the in-flight slot. A
    /// panicked exchange counts as a failed refresh.
    fn spawn_exchange(&self, current: Credential) -> PendingRefresh {
        let client = self.client.clone();
        let store = Arc::clone(&self.store);
        let slot = Arc::clone(&self.in_flight);

        let task = tokio::spawn(async move {
            let inner =
                tokio::spawn(async move { exchange(&client, store.as_ref(), current).await });
            let renewed = inner.await.unwrap_or_else(|e| {
                warn!(error = %e, "Token exchange panicked");
                None
            });
            slot.lock().await.take();
            renewed
        });

        task.map(|joined| {
            joined.unwrap_or_else(|e| {
                warn!(error = %e, "Token refresh task failed");
                None
            })
        })
        .boxed()
        .shared()
    }
}

/// Exchange the stored refresh token for a new access token and persist the
/// result.
#[instrument(skip_all, fields(user_id = %current.user_id()))]
async fn exchange(
    client: &ApiClient,
    store: &dyn SessionStore,
    current: Credential,
) -> Option<Credential> {
    info!("Refreshing access token");

    let request = AccessTokenRequest {
        refresh_token: current.refresh_token().as_str(),
        user_id: current.user_id(),
    };

    let response: AccessTokenResponse = match client.post(ACCESS_TOKEN_ROUTE, &request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Token refresh rejected");
            return None;
        }
    };

    let renewed = match current.renewed(
        response.access_token,
        Some(response.expiration_timestamp),
        response.refresh_token,
    ) {
        Ok(renewed) => renewed,
        Err(e) => {
            warn!(error = %e, "Token refresh returned an unusable credential");
            return None;
        }
    };

    if let Err(e) = store.set(renewed.clone()).await {
        warn!(error = %e, "Failed to persist renewed credential");
    }

    debug!("Access token refreshed");
    Some(renewed)
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("base_url", self.client.base_url())
            .field(
                "refresh_in_flight",
                &self
                    .in_flight
                    .try_lock()
                    .map(|slot| slot.is_some())
                    .unwrap_or(true),
            )
            .finish()
    }
}
