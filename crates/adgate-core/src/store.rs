//! `SharedStore`: the abstraction over the distributed key-value store
//! backing both the Quota Governor's balances and the Two-Tier Cache's
//! shared tier.
//!
//! A pluggable backing store behind a trait, rather than hard-wiring a
//! single client type into every caller. Production deployments use
//! [`RedisStore`] (feature `redis`); tests and examples use [`MemoryStore`].
//!
//! Every operation returns [`StoreResult`]; callers are expected to treat a
//! `StoreError` as a transient condition (the same "fail open, log, don't
//! raise" discipline `original_source/core/quota.py` and `core/cache.py`
//! apply throughout) rather than a fatal one.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shared store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// A distributed key-value store with the small set of operations the
/// quota and cache subsystems need: scalar get/set, integer incr/decr
/// (pipelined two-key variants for the quota governor's atomic-enough
/// charge/refund), string get/setex for cache payloads, delete, and a
/// pattern scan-delete for cache purges.
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// Reads a decimal-integer value, defaulting to `default` when absent.
    async fn get_int(&self, key: &str, default: i64) -> StoreResult<i64>;

    /// Decrements two counters in a single round-trip, returning their new
    /// values in order. Mirrors `core/quota.py`'s `pipe.decrby(...)` pair.
    async fn decr_by_pair(&self, key_a: &str, key_b: &str, amount: i64) -> StoreResult<(i64, i64)>;

    /// Increments two counters in a single round-trip (the `refund` mirror
    /// of [`SharedStore::decr_by_pair`]).
    async fn incr_by_pair(&self, key_a: &str, key_b: &str, amount: i64) -> StoreResult<(i64, i64)>;

    /// Sets a decimal-integer value unconditionally (used by
    /// `reset_global`/`set_client_quota`).
    async fn set_int(&self, key: &str, value: i64) -> StoreResult<()>;

    /// Reads a raw string value.
    async fn get_str(&self, key: &str) -> StoreResult<Option<String>>;

    /// Sets a raw string value, unconditionally.
    async fn set_str(&self, key: &str, value: String) -> StoreResult<()>;

    /// Sets a raw string value with a TTL, as used by the cache's shared
    /// tier.
    async fn setex_str(&self, key: &str, value: String, ttl: Duration) -> StoreResult<()>;

    /// Deletes a single key. Returns whether a key was actually removed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Deletes every key matching a glob-style `pattern` (e.g.
    /// `cache:client:123:*`), returning the count removed. Mirrors
    /// `core/cache.py`'s `scan_iter` + bulk `delete`.
    async fn delete_pattern(&self, pattern: &str) -> StoreResult<u64>;
}

/// An in-memory [`SharedStore`] for tests, examples, and single-process
/// deployments that don't need cross-process sharing. Not a cache
/// replacement for [`RedisStore`] in a multi-tenant fleet.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    ints: HashMap<String, i64>,
    strings: HashMap<String, (String, Option<Instant>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn glob_match(pattern: &str, key: &str) -> bool {
    // Only `*` wildcards are used by this system's pattern purges; a small
    // hand-rolled matcher avoids pulling in a glob crate for one call site.
    match pattern.split_once('*') {
        None => pattern == key,
        Some((prefix, suffix)) => key.starts_with(prefix) && key.ends_with(suffix),
    }
}

#[async_trait]
impl SharedStore for MemoryStore {
    async fn get_int(&self, key: &str, default: i64) -> StoreResult<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(*inner.ints.get(key).unwrap_or(&default))
    }

    async fn decr_by_pair(&self, key_a: &str, key_b: &str, amount: i64) -> StoreResult<(i64, i64)> {
        let mut inner = self.inner.lock().unwrap();
        let a = inner.ints.entry(key_a.to_string()).or_insert(0);
        *a -= amount;
        let a_val = *a;
        let b = inner.ints.entry(key_b.to_string()).or_insert(0);
        *b -= amount;
        let b_val = *b;
        Ok((a_val, b_val))
    }

    async fn incr_by_pair(&self, key_a: &str, key_b: &str, amount: i64) -> StoreResult<(i64, i64)> {
        self.decr_by_pair(key_a, key_b, -amount).await
    }

    async fn set_int(&self, key: &str, value: i64) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.ints.insert(key.to_string(), value);
        Ok(())
    }

    async fn get_str(&self, key: &str) -> StoreResult<Option<String>> {
        let mut inner = self.inner.lock().unwrap();
        if let Some((value, expires_at)) = inner.strings.get(key).cloned() {
            if let Some(expires_at) = expires_at {
                if Instant::now() >= expires_at {
                    inner.strings.remove(key);
                    return Ok(None);
                }
            }
            return Ok(Some(value));
        }
        Ok(None)
    }

    async fn set_str(&self, key: &str, value: String) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.strings.insert(key.to_string(), (value, None));
        Ok(())
    }

    async fn setex_str(&self, key: &str, value: String, ttl: Duration) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .strings
            .insert(key.to_string(), (value, Some(Instant::now() + ttl)));
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let had_int = inner.ints.remove(key).is_some();
        let had_str = inner.strings.remove(key).is_some();
        Ok(had_int || had_str)
    }

    async fn delete_pattern(&self, pattern: &str) -> StoreResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let matching: Vec<String> = inner
            .strings
            .keys()
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect();
        let count = matching.len() as u64;
        for key in matching {
            inner.strings.remove(&key);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn int_default_when_absent() {
        let store = MemoryStore::new();
        assert_eq!(store.get_int("missing", 7).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn decr_and_incr_pair_are_symmetric() {
        let store = MemoryStore::new();
        store.set_int("a", 100).await.unwrap();
        store.set_int("b", 50).await.unwrap();

        let (a, b) = store.decr_by_pair("a", "b", 10).await.unwrap();
        assert_eq!((a, b), (90, 40));

        let (a, b) = store.incr_by_pair("a", "b", 10).await.unwrap();
        assert_eq!((a, b), (100, 50));
    }

    #[tokio::test]
    async fn setex_expires() {
        let store = MemoryStore::new();
        store
            .setex_str("k", "v".to_string(), Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(store.get_str("k").await.unwrap(), Some("v".to_string()));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get_str("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_pattern_matches_prefix_glob() {
        let store = MemoryStore::new();
        store.set_str("cache:client:1:a", "x".into()).await.unwrap();
        store.set_str("cache:client:1:b", "y".into()).await.unwrap();
        store.set_str("cache:client:2:a", "z".into()).await.unwrap();

        let deleted = store.delete_pattern("cache:client:1:*").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.get_str("cache:client:2:a").await.unwrap(), Some("z".to_string()));
    }
}
