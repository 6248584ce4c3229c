//! The two-tier cache itself: an in-process LRU in front of a
//! [`SharedStore`]-backed shared tier, grounded on
//! `original_source/core/cache.py`'s `CacheManager`/`LRUCache` pair.

use crate::config::{CacheConfig, CacheConfigBuilder};
use crate::events::CacheEvent;
use crate::fingerprint::fingerprint;
use crate::stats::{CacheStats, CacheStatsInner};
use crate::ttl::ttl_for_service;
use adgate_core::SharedStore;
use lru::LruCache;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Instant;

fn glob_match(pattern: &str, key: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == key,
        Some((prefix, suffix)) => key.starts_with(prefix) && key.ends_with(suffix),
    }
}

/// Namespaces a fingerprint for the shared tier per the `cache:{fingerprint}`
/// key schema (§6) — distinct from the bare fingerprint used as the local
/// LRU's own key, so shared-store cache entries never collide with the
/// quota/tier keys that also live under `client:...`.
fn shared_key(fingerprint: &str) -> String {
    format!("cache:{fingerprint}")
}

pub struct TwoTierCache<S> {
    store: Arc<S>,
    local: Mutex<LruCache<String, String>>,
    config: CacheConfig,
    stats: CacheStatsInner,
}

impl<S> TwoTierCache<S>
where
    S: SharedStore + 'static,
{
    pub fn builder(store: Arc<S>) -> CacheConfigBuilder<S> {
        CacheConfigBuilder::new(store)
    }

    pub(crate) fn new(store: Arc<S>, config: CacheConfig) -> Self {
        Self {
            store,
            local: Mutex::new(LruCache::new(config.local_capacity)),
            config,
            stats: CacheStatsInner::default(),
        }
    }

    fn emit(&self, event: CacheEvent) {
        self.config.event_listeners.emit(&event);
    }

    /// Looks up `tenant`/`op`/`params` in the local LRU tier, then the
    /// shared tier, promoting a shared-tier hit into the local tier before
    /// returning it.
    pub async fn get(&self, tenant: &str, op: &str, params: &[(&str, &str)]) -> Option<Value> {
        let key = fingerprint(tenant, op, params);

        if let Some(raw) = self.local.lock().unwrap().get(&key).cloned() {
            self.stats.record_hit();
            self.emit(CacheEvent::Hit {
                name: self.config.name.clone(),
                timestamp: Instant::now(),
                key: key.clone(),
            });
            return serde_json::from_str(&raw).ok();
        }

        match self.store.get_str(&shared_key(&key)).await {
            Ok(Some(raw)) => {
                self.promote(&key, raw.clone());
                self.stats.record_hit();
                self.emit(CacheEvent::Hit {
                    name: self.config.name.clone(),
                    timestamp: Instant::now(),
                    key: key.clone(),
                });
                serde_json::from_str(&raw).ok()
            }
            _ => {
                self.stats.record_miss();
                self.emit(CacheEvent::Miss {
                    name: self.config.name.clone(),
                    timestamp: Instant::now(),
                    key,
                });
                None
            }
        }
    }

    fn promote(&self, key: &str, raw: String) {
        let evicted = self.local.lock().unwrap().push(key.to_string(), raw);
        self.note_eviction(evicted);
    }

    fn note_eviction(&self, evicted: Option<(String, String)>) {
        if let Some((evicted_key, _)) = evicted {
            self.stats.record_eviction();
            self.emit(CacheEvent::Eviction {
                name: self.config.name.clone(),
                timestamp: Instant::now(),
                key: evicted_key,
            });
        }
    }

    /// Writes `value` into both tiers, keyed by `tenant`/`op`/`params`.
    /// `service` selects the shared-tier TTL via [`ttl_for_service`].
    pub async fn set(&self, tenant: &str, op: &str, params: &[(&str, &str)], service: &str, value: &Value) {
        let key = fingerprint(tenant, op, params);
        let raw = value.to_string();

        let evicted = self.local.lock().unwrap().push(key.clone(), raw.clone());
        self.note_eviction(evicted);
        self.stats.record_set();

        let ttl = ttl_for_service(service);
        if self.store.setex_str(&shared_key(&key), raw, ttl).await.is_err() {
            self.emit(CacheEvent::SharedWriteError {
                name: self.config.name.clone(),
                timestamp: Instant::now(),
                key,
            });
        }
    }

    /// Removes a single entry (in both tiers), keyed by `tenant`/`op`/`params`,
    /// matching `CacheManager.delete`.
    pub async fn delete(&self, tenant: &str, op: &str, params: &[(&str, &str)]) -> bool {
        let key = fingerprint(tenant, op, params);
        let had_local = self.local.lock().unwrap().pop(&key).is_some();
        let had_shared = self.store.delete(&shared_key(&key)).await.unwrap_or(false);
        had_local || had_shared
    }

    /// Removes every entry (in both tiers) whose key matches `pattern`
    /// (single `*` wildcard), mirroring `CacheManager.clear_pattern`. `pattern`
    /// is matched against the bare fingerprint (e.g. `client:acme:*`); it is
    /// namespaced with `cache:` before being matched against the shared tier.
    pub async fn purge(&self, pattern: &str) -> u64 {
        let removed_local = {
            let mut local = self.local.lock().unwrap();
            let matching: Vec<String> = local
                .iter()
                .map(|(k, _)| k.clone())
                .filter(|k| glob_match(pattern, k))
                .collect();
            for key in &matching {
                local.pop(key);
            }
            matching.len() as u64
        };

        let removed_shared = self
            .store
            .delete_pattern(&shared_key(pattern))
            .await
            .unwrap_or(0);
        removed_local.max(removed_shared)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgate_core::MemoryStore;
    use serde_json::json;

    fn cache() -> TwoTierCache<MemoryStore> {
        TwoTierCache::builder(Arc::new(MemoryStore::new()))
            .local_capacity(2)
            .build()
    }

    #[tokio::test]
    async fn miss_then_hit_after_set() {
        let cache = cache();
        assert!(cache.get("acme", "campaign", &[("id", "1")]).await.is_none());

        cache
            .set("acme", "campaign", &[("id", "1")], "campaign", &json!({"name": "spring"}))
            .await;

        let value = cache.get("acme", "campaign", &[("id", "1")]).await.unwrap();
        assert_eq!(value, json!({"name": "spring"}));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.sets, 1);
    }

    #[tokio::test]
    async fn shared_tier_hit_promotes_into_local_tier() {
        let store = Arc::new(MemoryStore::new());
        let cache = TwoTierCache::builder(Arc::clone(&store)).build();

        store
            .setex_str(
                "cache:client:acme:budget:id=9",
                json!({"limit": 100}).to_string(),
                std::time::Duration::from_secs(60),
            )
            .await
            .unwrap();

        let value = cache.get("acme", "budget", &[("id", "9")]).await.unwrap();
        assert_eq!(value, json!({"limit": 100}));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn delete_removes_a_single_key_from_both_tiers() {
        let cache = cache();
        cache.set("acme", "campaign", &[("id", "1")], "campaign", &json!(1)).await;
        cache.set("acme", "campaign", &[("id", "2")], "campaign", &json!(2)).await;

        assert!(cache.delete("acme", "campaign", &[("id", "1")]).await);
        assert!(cache.get("acme", "campaign", &[("id", "1")]).await.is_none());
        assert!(cache.get("acme", "campaign", &[("id", "2")]).await.is_some());
    }

    #[tokio::test]
    async fn local_tier_evicts_oldest_beyond_capacity() {
        let cache = cache(); // local_capacity(2)
        cache.set("a", "op", &[], "default", &json!(1)).await;
        cache.set("b", "op", &[], "default", &json!(2)).await;
        cache.set("c", "op", &[], "default", &json!(3)).await;

        assert!(cache.stats().evictions >= 1);
    }

    #[tokio::test]
    async fn purge_removes_matching_keys_from_both_tiers() {
        let cache = cache();
        cache.set("acme", "reporting", &[("d", "1")], "reporting", &json!(1)).await;
        cache.set("acme", "reporting", &[("d", "2")], "reporting", &json!(2)).await;
        cache.set("other", "reporting", &[("d", "1")], "reporting", &json!(3)).await;

        let removed = cache.purge("client:acme:*").await;
        assert!(removed >= 2);
        assert!(cache.get("acme", "reporting", &[("d", "1")]).await.is_none());
        assert!(cache.get("other", "reporting", &[("d", "1")]).await.is_some());
    }
}
