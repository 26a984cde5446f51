//! Key-value store access for link mappings and click counters.
//!
//! Provides the [`ConnectionManager`] and two [`KeyValueStore`](crate::domain::repositories::KeyValueStore)
//! implementations:
//! - [`RedisStore`] - Production Redis-backed store, opened by [`RedisConnector`]
//! - [`MemoryStore`] - In-process store for tests and single-process development

mod connection_manager;
mod memory_store;
mod redis_store;

pub use connection_manager::{ConnectionManager, ConnectionState, StoreConnector};
pub use memory_store::MemoryStore;
pub use redis_store::{RedisConnector, RedisStore};

#[cfg(test)]
pub use connection_manager::MockStoreConnector;
