//! Result helpers.

/// A result that carries no payload, only the outcome.
pub type EmptyResult<E> = std::result::Result<(), E>;

/// Extensions on [`std::result::Result`].
pub trait ResultExt<E> {
    /// Discard the success payload, keeping only success or failure.
    fn as_empty(self) -> EmptyResult<E>;
}

impl<T, E> ResultExt<E> for std::result::Result<T, E> {
    fn as_empty(self) -> EmptyResult<E> {
        self.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;

    #[test]
    fn as_empty_keeps_shape() {
        let ok: Result<u32, NetworkError> = Ok(7);
        assert_eq!(ok.as_empty(), Ok(()));

        let err: Result<u32, NetworkError> = Err(NetworkError::Conflict);
        assert_eq!(err.as_empty(), Err(NetworkError::Conflict));
    }

    #[test]
    fn map_leaves_failure_untouched() {
        let err: Result<u32, NetworkError> = Err(NetworkError::ServerError);
        let mapped = err.map(|n| n.to_string());
        assert_eq!(mapped, Err(NetworkError::ServerError));
    }
}
