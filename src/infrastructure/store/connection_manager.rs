//! Liveness-checked, lazily reconnecting access to the store.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{error, info, warn};

use crate::domain::repositories::{StoreError, StoreHandle, StoreResult};

/// Opens new connections to the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::RedisConnector`] - Opens Redis connections
/// - [`crate::infrastructure::store::MemoryStore`] - Hands out handles onto shared memory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Establishes a new connection. The manager pings it before first use.
    async fn connect(&self) -> StoreResult<StoreHandle>;
}

/// Lifecycle of the managed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the single logical store connection.
///
/// Every [`acquire`](Self::acquire) pings the cached handle and reconnects within
/// the same call if the ping fails, so callers always receive a handle that has
/// just proven itself live. Connection failures are returned to the caller as
/// [`StoreError::Unavailable`]; nothing is retried here.
///
/// Reconnects are serialized by an async mutex. Probes and store I/O run without
/// the lock held.
pub struct ConnectionManager {
    connector: Arc<dyn StoreConnector>,
    handle: Mutex<Option<StoreHandle>>,
    state: watch::Sender<ConnectionState>,
}

impl ConnectionManager {
    /// Creates a manager in the `Disconnected` state. The first
    /// [`acquire`](Self::acquire) connects.
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            handle: Mutex::new(None),
            state: watch::Sender::new(ConnectionState::Disconnected),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Returns a handle that has just passed a liveness probe.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if no live connection can be established.
    pub async fn acquire(&self) -> StoreResult<StoreHandle> {
        let cached = self.handle.lock().await.clone();

        match cached {
            Some(handle) => match handle.ping().await {
                Ok(()) => Ok(handle),
                Err(e) => {
                    warn!(error = %e, "Store liveness probe failed, reconnecting");
                    self.state.send_replace(ConnectionState::Disconnected);
                    self.reconnect(Some(&handle)).await
                }
            },
            None => self.reconnect(None).await,
        }
    }

    /// Replaces `stale` with a fresh connection.
    ///
    /// If another caller already swapped in a new handle while this one waited for
    /// the lock, that handle is probed and reused.
    async fn reconnect(&self, stale: Option<&StoreHandle>) -> StoreResult<StoreHandle> {
        let mut slot = self.handle.lock().await;

        if let Some(current) = slot.as_ref() {
            let replaced = stale.is_none_or(|stale| !Arc::ptr_eq(stale, current));
            if replaced && current.ping().await.is_ok() {
                return Ok(current.clone());
            }
        }

        *slot = None;
        self.state.send_replace(ConnectionState::Connecting);

        match self.establish().await {
            Ok(handle) => {
                *slot = Some(handle.clone());
                self.state.send_replace(ConnectionState::Connected);
                metrics::counter!("shortener_store_reconnects_total").increment(1);
                info!("✓ Connected to store");
                Ok(handle)
            }
            Err(e) => {
                self.state.send_replace(ConnectionState::Disconnected);
                error!(error = %e, "Store connection failed");
                Err(StoreError::Unavailable(e.to_string()))
            }
        }
    }

    async fn establish(&self) -> StoreResult<StoreHandle> {
        let handle = self.connector.connect().await?;
        handle.ping().await?;
        Ok(handle)
    }
}
