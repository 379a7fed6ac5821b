//! runique-http - reqwest-backed request pipeline for runique.
//!
//! Every request goes through [`ApiClient`], which converts transport
//! failures and HTTP statuses into [`NetworkError`](runique_core::NetworkError)
//! values. An attached [`TokenAuthenticator`] supplies bearer tokens and
//! renews them, one exchange at a time, when the server answers 401.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use runique_core::{BaseUrl, KeyValueSessionStore, MemoryKeyValueStore, SessionStore};
//! use runique_http::{ApiClient, AuthRepository, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn SessionStore> =
//!     Arc::new(KeyValueSessionStore::new(MemoryKeyValueStore::new()));
//! let config = ClientConfig::new(BaseUrl::new("https://api.runique.dev")?, "api-key");
//! let client = ApiClient::authenticated(config, Arc::clone(&store))?;
//!
//! let auth = AuthRepository::new(&client, store);
//! auth.login("runner@runique.dev", "Secret12345").await?;
//!
//! let runs: serde_json::Value = client.get("/runs", &[]).await?;
//! println!("{runs}");
//! # Ok(())
//! # }
//! ```

mod authenticator;
mod client;
mod config;
pub mod endpoints;
mod error;
mod repository;

pub use authenticator::TokenAuthenticator;
pub use client::{ApiClient, Query};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use repository::AuthRepository;
