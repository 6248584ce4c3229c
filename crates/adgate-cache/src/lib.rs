//! Two-tier response cache: an in-process LRU in front of a shared,
//! cross-process tier.
//!
//! # When to Use
//!
//! Put a [`TwoTierCache`] in front of read-only upstream calls that are
//! expensive, rate-limited, or shared across many requests for the same
//! tenant. A hit in either tier avoids the upstream call entirely; a shared
//! tier hit is promoted into the local tier so the next request for the
//! same key is served without a network round trip.
//!
//! # Example
//!
//! ```
//! use adgate_core::MemoryStore;
//! use adgate_cache::TwoTierCache;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache = TwoTierCache::builder(Arc::new(MemoryStore::new())).build();
//!
//! assert!(cache.get("acme", "campaign", &[("id", "1")]).await.is_none());
//! cache
//!     .set("acme", "campaign", &[("id", "1")], "campaign", &json!({"name": "spring"}))
//!     .await;
//! assert!(cache.get("acme", "campaign", &[("id", "1")]).await.is_some());
//! # }
//! ```

mod cache;
mod config;
mod events;
mod fingerprint;
mod stats;
mod ttl;

pub use cache::TwoTierCache;
pub use config::{CacheConfig, CacheConfigBuilder};
pub use events::CacheEvent;
pub use fingerprint::fingerprint;
pub use stats::CacheStats;
pub use ttl::ttl_for_service;
