//! In-process store with Redis-compatible TTL semantics.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use super::connection_manager::StoreConnector;
use crate::domain::repositories::{KeyTtl, KeyValueStore, StoreError, StoreHandle, StoreResult};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// A store kept in process memory.
///
/// Expired keys are dropped when accessed, and every write sweeps all expired
/// keys, so links that are never read again do not pile up. Time is read from `tokio::time`, so tests can move a
/// paused clock past a TTL.
///
/// # Use Cases
///
/// - Tests that need real store semantics without a Redis server
/// - Single-process development runs (`STORE_BACKEND=memory`)
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the map with `key` already purged if it has expired.
    fn lock_live(&self, key: &str) -> (MutexGuard<'_, HashMap<String, Entry>>, Instant) {
        let now = Instant::now();
        let mut entries = self.lock();
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        (entries, now)
    }

    /// Locks the map with every expired key removed.
    fn lock_swept(&self) -> (MutexGuard<'_, HashMap<String, Entry>>, Instant) {
        let now = Instant::now();
        let mut entries = self.lock();
        entries.retain(|_, e| !e.is_expired(now));
        (entries, now)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        let (mut entries, now) = self.lock_swept();
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now.checked_add(Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<bool> {
        let (mut entries, now) = self.lock_swept();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now.checked_add(Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(true)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let (entries, _) = self.lock_live(key);
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let (mut entries, _) = self.lock_live(key);
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expires_at: None,
        });

        let next = entry
            .value
            .parse::<i64>()
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                StoreError::Command("value is not an integer or out of range".to_string())
            })?;

        // INCR keeps the key's existing TTL.
        entry.value = next.to_string();
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool> {
        let (mut entries, now) = self.lock_live(key);
        match entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = now.checked_add(Duration::from_secs(ttl_seconds));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl> {
        let (entries, now) = self.lock_live(key);
        let ttl = match entries.get(key) {
            None => KeyTtl::Missing,
            Some(Entry {
                expires_at: None, ..
            }) => KeyTtl::Persistent,
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => {
                let remaining = at.saturating_duration_since(now);
                // Round up so a key with 0.4s left still reports 1s, as Redis does.
                KeyTtl::Expires(remaining.as_millis().div_ceil(1000) as u64)
            }
        };
        Ok(ttl)
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        let (mut entries, _) = self.lock_live(key);
        Ok(entries.remove(key).is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Every connection to a memory store is a handle onto the same shared map.
#[async_trait]
impl StoreConnector for MemoryStore {
    async fn connect(&self) -> StoreResult<StoreHandle> {
        Ok(Arc::new(self.clone()))
    }
}
