//! Error types for the runique client.
//!
//! Every failure that crosses into domain code is one of two closed enums:
//! [`NetworkError`] for transport and protocol failures, [`LocalError`] for
//! persistence failures. [`DataError`] is their union for operations that
//! touch both.

use thiserror::Error;

/// Transport and protocol failures observed by a request.
///
/// The set is closed. Callers match exhaustively or fall through to
/// [`NetworkError::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NetworkError {
    /// The server answered 408.
    #[error("request timed out")]
    RequestTimeout,

    /// The server answered 401, or a token refresh could not recover it.
    #[error("unauthorized")]
    Unauthorized,

    /// The server answered 409.
    #[error("conflict")]
    Conflict,

    /// The server answered 429.
    #[error("too many requests")]
    TooManyRequests,

    /// The host could not be resolved or reached.
    #[error("no internet connection")]
    NoInternet,

    /// The server answered 413.
    #[error("payload too large")]
    PayloadTooLarge,

    /// The server answered with a 5xx status.
    #[error("server error")]
    ServerError,

    /// A request or response body could not be (de)serialized.
    #[error("serialization failed")]
    Serialization,

    /// Anything else.
    #[error("unknown network error")]
    Unknown,
}

impl NetworkError {
    /// Map a non-success HTTP status code to its error kind.
    ///
    /// Returns `None` for 2xx codes, which are not errors.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 => Some(NetworkError::Unauthorized),
            408 => Some(NetworkError::RequestTimeout),
            409 => Some(NetworkError::Conflict),
            413 => Some(NetworkError::PayloadTooLarge),
            429 => Some(NetworkError::TooManyRequests),
            500..=599 => Some(NetworkError::ServerError),
            _ => Some(NetworkError::Unknown),
        }
    }
}

/// Persistence-layer failures surfaced by a key-value collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum LocalError {
    /// The storage medium has no space left.
    #[error("disk full")]
    DiskFull,

    /// Any other storage failure (permissions, I/O, worker panic).
    #[error("local storage failure")]
    Unknown,
}

impl From<std::io::Error> for LocalError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::StorageFull {
            LocalError::DiskFull
        } else {
            LocalError::Unknown
        }
    }
}

/// Union of [`NetworkError`] and [`LocalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DataError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Local(#[from] LocalError),
}

impl DataError {
    /// A generic, user-presentable description of this error.
    ///
    /// Screens that know more about the operation (a login form, a
    /// registration form) should special-case the kinds that carry meaning
    /// there before falling back to this.
    pub fn user_message(&self) -> &'static str {
        match self {
            DataError::Local(LocalError::DiskFull) => {
                "Your storage is full. Free some space and try again."
            }
            DataError::Network(NetworkError::NoInternet) => {
                "Couldn't reach the server. Check your internet connection."
            }
            DataError::Network(NetworkError::PayloadTooLarge) => {
                "The request is too large to upload."
            }
            DataError::Network(NetworkError::RequestTimeout) => {
                "The request timed out. Please try again."
            }
            DataError::Network(NetworkError::ServerError) => {
                "The server encountered an error. Please try again later."
            }
            DataError::Network(NetworkError::Serialization) => {
                "Couldn't parse the server's response."
            }
            DataError::Network(NetworkError::TooManyRequests) => {
                "Too many requests. Slow down and try again shortly."
            }
            _ => "Something went wrong. Please try again.",
        }
    }
}

/// Input validation errors for values constructed from untrusted strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// A credential field was empty.
    #[error("credential field '{field}' must not be empty")]
    EmptyCredentialField { field: &'static str },
}
