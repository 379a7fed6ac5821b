//! Session store trait.

use async_trait::async_trait;

use crate::credential::Credential;
use crate::error::LocalError;

/// Durable single-slot storage for the current [`Credential`].
///
/// Implementations must make `set` atomic from the caller's perspective: a
/// concurrent `get` observes either the previous credential or the new one,
/// never a mix. Between writes, every `get` returns the same value.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored credential, or `None` if there is none.
    async fn get(&self) -> Option<Credential>;

    /// Replace the stored credential.
    async fn set(&self, credential: Credential) -> Result<(), LocalError>;

    /// Remove the stored credential.
    async fn clear(&self) -> Result<(), LocalError>;
}
