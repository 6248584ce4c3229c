use adgate_core::ResilienceEvent;
use std::time::Instant;

/// Events emitted by a [`crate::TwoTierCache`] for observability.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// Served from either the local LRU or the shared tier.
    Hit {
        name: String,
        timestamp: Instant,
        key: String,
    },
    /// Not found in either tier.
    Miss {
        name: String,
        timestamp: Instant,
        key: String,
    },
    /// The local LRU evicted an entry to make room for a new one.
    Eviction {
        name: String,
        timestamp: Instant,
        key: String,
    },
    /// Writing through to the shared tier failed (the local tier still has
    /// the value; the shared tier will miss it until the next write).
    SharedWriteError {
        name: String,
        timestamp: Instant,
        key: String,
    },
}

impl ResilienceEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "cache_hit",
            CacheEvent::Miss { .. } => "cache_miss",
            CacheEvent::Eviction { .. } => "cache_eviction",
            CacheEvent::SharedWriteError { .. } => "cache_shared_write_error",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Eviction { timestamp, .. }
            | CacheEvent::SharedWriteError { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            CacheEvent::Hit { name, .. }
            | CacheEvent::Miss { name, .. }
            | CacheEvent::Eviction { name, .. }
            | CacheEvent::SharedWriteError { name, .. } => name,
        }
    }
}
