//! Production [`SharedStore`] backed by Redis.
//!
//! Uses `redis::aio::ConnectionManager`, the idiom this pack's retrieved
//! stream-worker code uses for a long-lived, auto-reconnecting async Redis
//! handle, rather than opening a connection per call. The pipelined
//! decrement/increment pair mirrors `core/quota.py`'s
//! `redis.pipeline(); pipe.decrby(...); pipe.decrby(...); pipe.execute()`.

use crate::store::{SharedStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to `redis_url` and establishes the auto-reconnecting
    /// connection manager. Call once at startup and share the resulting
    /// handle (it's cheaply `Clone`).
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| StoreError(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Wraps an already-established connection manager (useful when the
    /// caller shares one Redis client across several `adgate` components).
    pub fn from_connection_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

fn redis_err(e: redis::RedisError) -> StoreError {
    StoreError(e.to_string())
}

#[async_trait]
impl SharedStore for RedisStore {
    async fn get_int(&self, key: &str, default: i64) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let value: Option<i64> = conn.get(key).await.map_err(redis_err)?;
        Ok(value.unwrap_or(default))
    }

    async fn decr_by_pair(&self, key_a: &str, key_b: &str, amount: i64) -> StoreResult<(i64, i64)> {
        let mut conn = self.conn.clone();
        let (a, b): (i64, i64) = redis::pipe()
            .atomic()
            .decr(key_a, amount)
            .decr(key_b, amount)
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;
        Ok((a, b))
    }

    async fn incr_by_pair(&self, key_a: &str, key_b: &str, amount: i64) -> StoreResult<(i64, i64)> {
        let mut conn = self.conn.clone();
        let (a, b): (i64, i64) = redis::pipe()
            .atomic()
            .incr(key_a, amount)
            .incr(key_b, amount)
            .query_async(&mut conn)
            .await
            .map_err(redis_err)?;
        Ok((a, b))
    }

    async fn set_int(&self, key: &str, value: i64) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(redis_err)
    }

    async fn get_str(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(redis_err)
    }

    async fn set_str(&self, key: &str, value: String) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(redis_err)
    }

    async fn setex_str(&self, key: &str, value: String, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(redis_err)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await.map_err(redis_err)?;
        Ok(removed > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> StoreResult<u64> {
        let mut conn = self.conn.clone();
        let mut keys: Vec<String> = Vec::new();
        let mut iter: redis::AsyncIter<'_, String> =
            conn.scan_match(pattern).await.map_err(redis_err)?;
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        drop(iter);
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: u64 = conn.del(keys).await.map_err(redis_err)?;
        Ok(removed)
    }
}
