//! Key-value store contract used for link mappings and click counters.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Errors that can occur while talking to the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The connection could not be established.
    #[error("Store connection error: {0}")]
    Connection(String),

    /// An operation did not complete within its deadline.
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store answered with an error.
    #[error("Store command error: {0}")]
    Command(String),

    /// No live connection could be obtained.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to a live store connection.
pub type StoreHandle = Arc<dyn KeyValueStore>;

/// Remaining lifetime of a key as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    Missing,
    Persistent,
    Expires(u64),
}

impl KeyTtl {
    /// Decodes the integer reply of the Redis `TTL` command.
    pub fn from_reply(reply: i64) -> Self {
        match reply {
            -2 => Self::Missing,
            n if n < 0 => Self::Persistent,
            n => Self::Expires(n as u64),
        }
    }
}

/// Contract for the external store holding mappings and counters.
///
/// Implementations must be safe to share between request tasks and must bound
/// every call with a timeout.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisStore`] - Redis-backed store
/// - [`crate::infrastructure::store::MemoryStore`] - In-process store for tests and development
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value, expiring after `ttl_seconds`.
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()>;

    /// Stores `value` under `key` only if the key does not exist.
    ///
    /// Returns `Ok(true)` when the value was written and `Ok(false)` when the key
    /// was already taken.
    async fn set_nx_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<bool>;

    /// Reads the value stored under `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Atomically increments the integer under `key`, creating it at 0 first.
    ///
    /// Returns the value after the increment.
    async fn incr(&self, key: &str) -> StoreResult<i64>;

    /// Sets a TTL on an existing key. Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool>;

    /// Reports the remaining lifetime of `key`.
    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl>;

    /// Deletes `key`. Returns `true` if a key was removed.
    async fn del(&self, key: &str) -> StoreResult<bool>;

    /// Round-trip liveness probe.
    async fn ping(&self) -> StoreResult<()>;
}
