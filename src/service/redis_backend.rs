//! Redis Backend
//!
//! Read capability backed by a Redis server.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::cache::KeyReader;
use crate::error::{ProxyError, Result};

/// Read-only Redis client over a multiplexed connection.
///
/// The connection is cloned per request, so concurrent lookups share one
/// socket without locking.
#[derive(Clone)]
pub struct RedisBackend {
    conn: MultiplexedConnection,
}

impl RedisBackend {
    // == Connect ==
    /// Opens a connection to `url` and verifies it with a PING.
    ///
    /// # Errors
    /// Returns `ProxyError::Backend` if the URL is invalid or the server
    /// cannot be reached.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url).map_err(init_error)?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(init_error)?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(init_error)?;

        info!("Connected to backing redis at {}", url);
        Ok(Self { conn })
    }
}

fn init_error(err: redis::RedisError) -> ProxyError {
    ProxyError::Backend(format!("could not initialize redis client: {}", err))
}

#[async_trait]
impl KeyReader for RedisBackend {
    async fn get(&self, key: &str) -> Result<String> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            ProxyError::Backend(format!("error while reading key {}: {}", key, e))
        })?;

        value.ok_or(ProxyError::NotFound)
    }
}
