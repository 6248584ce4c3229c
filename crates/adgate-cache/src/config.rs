//! Configuration for the two-tier cache, via a fluent builder.

use crate::cache::TwoTierCache;
use crate::events::CacheEvent;
use adgate_core::{EventListeners, FnListener, SharedStore};
use std::num::NonZeroUsize;
use std::sync::Arc;

pub struct CacheConfig {
    pub(crate) local_capacity: NonZeroUsize,
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
}

pub struct CacheConfigBuilder<S> {
    store: Arc<S>,
    local_capacity: NonZeroUsize,
    name: String,
    event_listeners: EventListeners<CacheEvent>,
}

impl<S> CacheConfigBuilder<S>
where
    S: SharedStore + 'static,
{
    pub(crate) fn new(store: Arc<S>) -> Self {
        Self {
            store,
            local_capacity: NonZeroUsize::new(1000).unwrap(),
            name: String::from("<unnamed>"),
            event_listeners: EventListeners::new(),
        }
    }

    /// Maximum number of entries held in the in-process LRU tier.
    ///
    /// Default: `1000`.
    pub fn local_capacity(mut self, capacity: usize) -> Self {
        self.local_capacity = NonZeroUsize::new(capacity).unwrap_or(self.local_capacity);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, CacheEvent::Hit { .. }) {
                f();
            }
        }));
        self
    }

    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, CacheEvent::Miss { .. }) {
                f();
            }
        }));
        self
    }

    pub fn on_eviction<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, CacheEvent::Eviction { .. }) {
                f();
            }
        }));
        self
    }

    pub fn build(self) -> TwoTierCache<S> {
        let config = CacheConfig {
            local_capacity: self.local_capacity,
            name: self.name,
            event_listeners: self.event_listeners,
        };
        TwoTierCache::new(self.store, config)
    }
}
