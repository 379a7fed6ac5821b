//! Client construction errors and transport error classification.

use runique_core::NetworkError;
use thiserror::Error;
use tracing::warn;

/// Errors building an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API key contains characters not allowed in a header value.
    #[error("API key is not a valid header value")]
    InvalidApiKey,

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Convert a transport-level failure into its [`NetworkError`] kind.
///
/// Only a failed address lookup is [`NetworkError::NoInternet`]; a refused
/// or reset connection to a resolved host is [`NetworkError::Unknown`]. The
/// failure is recorded before it is converted; callers only ever see the
/// kind.
pub(crate) fn classify_transport_error(err: reqwest::Error) -> NetworkError {
    let kind = if err.is_connect() && is_resolution_failure(&err) {
        NetworkError::NoInternet
    } else if err.is_decode() {
        NetworkError::Serialization
    } else {
        NetworkError::Unknown
    };
    warn!(error = %err, ?kind, "Request failed before a response was received");
    kind
}

/// Whether the error chain contains the connector's "dns error".
fn is_resolution_failure(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if cause.to_string().starts_with(DNS_ERROR) {
            return true;
        }
        source = cause.source();
    }
    false
}

const DNS_ERROR: &str = "dns error";

/// Record a body (de)serialization failure.
pub(crate) fn serialization_error(err: serde_json::Error) -> NetworkError {
    warn!(error = %err, "Failed to (de)serialize request or response body");
    NetworkError::Serialization
}
