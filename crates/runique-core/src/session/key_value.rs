//! [`SessionStore`] backed by a key-value provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::credential::Credential;
use crate::error::LocalError;

use super::SessionStore;

/// Key under which the serialized credential is stored.
pub const KEY_AUTH_INFO: &str = "key_auth_info";

/// A blocking key-value persistence provider.
///
/// Implementations do their own I/O synchronously; [`KeyValueSessionStore`]
/// moves calls onto the blocking thread pool. `set` must replace the value
/// atomically.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, LocalError>;

    fn set(&self, key: &str, value: &str) -> Result<(), LocalError>;

    fn remove(&self, key: &str) -> Result<(), LocalError>;
}

/// Persisted credential record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCredential {
    access_token: String,
    refresh_token: String,
    user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token_expiration_timestamp: Option<i64>,
}

impl From<&Credential> for StoredCredential {
    fn from(credential: &Credential) -> Self {
        Self {
            access_token: credential.access_token().as_str().to_string(),
            refresh_token: credential.refresh_token().as_str().to_string(),
            user_id: credential.user_id().to_string(),
            access_token_expiration_timestamp: credential.access_token_expiration(),
        }
    }
}

/// Stores the credential as one JSON record under [`KEY_AUTH_INFO`].
#[derive(Debug)]
pub struct KeyValueSessionStore<K> {
    kv: Arc<K>,
}

impl<K: KeyValueStore> KeyValueSessionStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv: Arc::new(kv) }
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &K {
        &self.kv
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, LocalError>
    where
        T: Send + 'static,
        F: FnOnce(&K) -> Result<T, LocalError> + Send + 'static,
    {
        let kv = Arc::clone(&self.kv);
        tokio::task::spawn_blocking(move || op(kv.as_ref()))
            .await
            .map_err(|e| {
                warn!(error = %e, "Session storage task failed");
                LocalError::Unknown
            })?
    }
}

#[async_trait]
impl<K: KeyValueStore> SessionStore for KeyValueSessionStore<K> {
    async fn get(&self) -> Option<Credential> {
        let raw = match self.blocking(|kv| kv.get(KEY_AUTH_INFO)).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                return None;
            }
        };

        let stored: StoredCredential = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable credential record");
                return None;
            }
        };

        match Credential::new(stored.access_token, stored.refresh_token, stored.user_id) {
            Ok(credential) => {
                Some(credential.with_expiration(stored.access_token_expiration_timestamp))
            }
            Err(e) => {
                warn!(error = %e, "Ignoring invalid credential record");
                None
            }
        }
    }

    async fn set(&self, credential: Credential) -> Result<(), LocalError> {
        let json = serde_json::to_string(&StoredCredential::from(&credential))
            .map_err(|_| LocalError::Unknown)?;
        self.blocking(move |kv| kv.set(KEY_AUTH_INFO, &json)).await?;
        debug!(user_id = %credential.user_id(), "Stored credential");
        Ok(())
    }

    async fn clear(&self) -> Result<(), LocalError> {
        self.blocking(|kv| kv.remove(KEY_AUTH_INFO)).await?;
        debug!("Cleared stored credential");
        Ok(())
    }
}
