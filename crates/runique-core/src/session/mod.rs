//! Credential persistence.

mod key_value;
mod memory;
mod store;

pub use key_value::{KEY_AUTH_INFO, KeyValueSessionStore, KeyValueStore};
pub use memory::MemoryKeyValueStore;
pub use store::SessionStore;
