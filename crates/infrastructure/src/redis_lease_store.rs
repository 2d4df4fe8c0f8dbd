//! Redis-backed lease store.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;

use crawlpool_application::{LeaseOp, LeaseStore};
use crawlpool_core::{AppError, AppResult};

/// Redis implementation of the lease store port.
///
/// Lease mappings are plain hashes; `apply` submits its operations as one
/// pipeline, preserving order within the round trip.
#[derive(Clone)]
pub struct RedisLeaseStore {
    client: redis::Client,
}

impl RedisLeaseStore {
    /// Creates a lease store over a configured Redis client.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl LeaseStore for RedisLeaseStore {
    async fn read_all(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let mut connection = self.connection().await?;

        connection
            .hgetall(key)
            .await
            .map_err(|error| AppError::Internal(format!("failed to read lease map: {error}")))
    }

    async fn apply(&self, key: &str, ops: &[LeaseOp]) -> AppResult<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for op in ops {
            match op {
                LeaseOp::SetExpiry { field, expires_at } => {
                    pipe.hset(key, field, *expires_at).ignore();
                }
                LeaseOp::Remove { field } => {
                    pipe.hdel(key, field).ignore();
                }
                LeaseOp::ExpireKey { ttl_seconds } => {
                    pipe.expire(key, *ttl_seconds).ignore();
                }
                LeaseOp::ExtendKeyTtl { ttl_seconds } => {
                    // EXPIRE ... GT raises the TTL without ever lowering it.
                    pipe.cmd("EXPIRE").arg(key).arg(*ttl_seconds).arg("GT").ignore();
                }
            }
        }

        let mut connection = self.connection().await?;
        pipe.query_async::<()>(&mut connection)
            .await
            .map_err(|error| AppError::Internal(format!("failed to apply lease pipeline: {error}")))
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: i64) -> AppResult<bool> {
        let mut connection = self.connection().await?;

        let acquired: bool = connection
            .set_nx(key, value)
            .await
            .map_err(|error| AppError::Internal(format!("failed to set lease key: {error}")))?;

        if !acquired {
            return Ok(false);
        }

        connection
            .expire::<_, ()>(key, ttl_seconds)
            .await
            .map_err(|error| AppError::Internal(format!("failed to set lease key ttl: {error}")))?;

        Ok(true)
    }
}
