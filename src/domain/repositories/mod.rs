//! Store trait definitions for the domain layer.
//!
//! The services never talk to Redis directly. They depend on the
//! [`KeyValueStore`] contract, which is implemented in
//! `crate::infrastructure::store` and handed out by the connection manager.
//!
//! Mock implementations are auto-generated via `mockall` for testing.

pub mod key_value_store;

pub use key_value_store::{KeyTtl, KeyValueStore, StoreError, StoreHandle, StoreResult};

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
