//! runique-core - Core types and traits for the runique client.
//!
//! This crate has no transport of its own. It defines the closed error
//! taxonomy, the session [`Credential`], the [`SessionStore`] seam and its
//! key-value adapter, and validation for user-entered account data.

pub mod credential;
pub mod error;
pub mod result;
pub mod session;
pub mod tokens;
pub mod types;
pub mod validation;

pub use credential::Credential;
pub use error::{DataError, InvalidInputError, LocalError, NetworkError};
pub use result::{EmptyResult, ResultExt};
pub use session::{KeyValueSessionStore, KeyValueStore, MemoryKeyValueStore, SessionStore};
pub use tokens::{AccessToken, RefreshToken};
pub use types::BaseUrl;
pub use validation::{PasswordValidationState, UserDataValidator};
