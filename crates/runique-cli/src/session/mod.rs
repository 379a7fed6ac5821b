//! On-disk session persistence for the CLI.

pub mod storage;

pub use storage::FileKeyValueStore;
