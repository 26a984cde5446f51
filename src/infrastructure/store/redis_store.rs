//! Redis-backed store implementation.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::MultiplexedConnection};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::connection_manager::StoreConnector;
use crate::domain::repositories::{KeyTtl, KeyValueStore, StoreError, StoreHandle, StoreResult};

/// Redis store over a single multiplexed connection.
///
/// The connection is cloned per operation, so concurrent requests pipeline over
/// one socket. Every command is bounded by `io_timeout`.
pub struct RedisStore {
    conn: MultiplexedConnection,
    io_timeout: Duration,
}

impl RedisStore {
    /// Opens a multiplexed connection, bounded by `connect_timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the handshake does not finish in time and
    /// [`StoreError::Connection`] if it fails.
    pub async fn connect(
        client: &Client,
        connect_timeout: Duration,
        io_timeout: Duration,
    ) -> StoreResult<Self> {
        let conn = tokio::time::timeout(connect_timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| StoreError::Timeout(connect_timeout))?
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { conn, io_timeout })
    }

    /// Awaits a command under the I/O deadline.
    async fn run<T>(&self, command: impl Future<Output = RedisResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.io_timeout, command)
            .await
            .map_err(|_| StoreError::Timeout(self.io_timeout))?
            .map_err(|e| StoreError::Command(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        self.run(conn.set_ex::<_, _, ()>(key, value, ttl_seconds))
            .await?;
        debug!("Redis SETEX: {} (TTL: {}s)", key, ttl_seconds);
        Ok(())
    }

    async fn set_nx_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX").arg("EX").arg(ttl_seconds);

        // Nil reply means the key already existed.
        let reply = self
            .run(cmd.query_async::<Option<String>>(&mut conn))
            .await?;
        Ok(reply.is_some())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        self.run(conn.get::<_, Option<String>>(key)).await
    }

    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        self.run(conn.incr::<_, _, i64>(key, 1i64)).await
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let seconds = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        self.run(conn.expire::<_, bool>(key, seconds)).await
    }

    async fn ttl(&self, key: &str) -> StoreResult<KeyTtl> {
        let mut conn = self.conn.clone();
        let reply = self.run(conn.ttl::<_, i64>(key)).await?;
        Ok(KeyTtl::from_reply(reply))
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let deleted = self.run(conn.del::<_, i64>(key)).await?;
        Ok(deleted > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        self.run(conn.ping::<()>()).await
    }
}

/// Opens fresh [`RedisStore`] connections for the connection manager.
pub struct RedisConnector {
    client: Client,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl RedisConnector {
    /// Creates a connector for `redis_url` without connecting yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid.
    pub fn new(redis_url: &str, connect_timeout: Duration, io_timeout: Duration) -> StoreResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        Ok(Self {
            client,
            connect_timeout,
            io_timeout,
        })
    }
}

#[async_trait]
impl StoreConnector for RedisConnector {
    async fn connect(&self) -> StoreResult<StoreHandle> {
        info!("Connecting to Redis");
        let store = RedisStore::connect(&self.client, self.connect_timeout, self.io_timeout).await?;
        Ok(Arc::new(store))
    }
}
