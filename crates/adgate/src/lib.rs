//! A multi-tenant admission-and-dispatch front-end for an upstream
//! advertising API.
//!
//! `adgate` is a meta-crate re-exporting its component crates behind
//! additive Cargo features:
//!
//! ```toml
//! [dependencies]
//! adgate = { version = "0.1", features = ["pipeline", "redis"] }
//! ```
//!
//! # Components
//!
//! - **[Quota Governor](quota)** (feature `quota`) — global and per-tenant
//!   daily unit budgets, with a bronze-reserve throttle protecting headroom
//!   for higher SLA tiers.
//! - **[Two-Tier Cache](cache)** (feature `cache`) — an in-process LRU
//!   fronting a shared store, with per-service-type TTLs and promotion on a
//!   shared-tier hit.
//! - **[Priority Scheduler](scheduler)** (feature `scheduler`) — a
//!   fixed-size worker pool dispatching operations by tier-weighted
//!   urgency.
//! - **[Operation Pipeline](pipeline)** (feature `pipeline`) — orchestrates
//!   the three components above around an injected upstream capability,
//!   with classified bounded retry.
//!
//! `adgate-core`'s error taxonomy ([`Error`], [`ErrorKind`]), event bus
//! ([`EventListener`], [`EventListeners`]), [`Tier`], and [`SharedStore`]
//! abstraction are always available at the crate root — every component
//! depends on them.

pub use adgate_core::{Error, ErrorKind, EventListener, EventListeners, FnListener, ResilienceEvent, SharedStore, Tier};

#[cfg(feature = "redis")]
pub use adgate_core::RedisStore;
pub use adgate_core::MemoryStore;

/// Global and per-tenant quota admission and accounting.
#[cfg(feature = "quota")]
pub mod quota {
    pub use adgate_quota::*;
}

/// Two-tier (in-process LRU + shared) response cache.
#[cfg(feature = "cache")]
pub mod cache {
    pub use adgate_cache::*;
}

/// Priority-weighted fair dispatch over a fixed-size worker pool.
#[cfg(feature = "scheduler")]
pub mod scheduler {
    pub use adgate_scheduler::*;
}

/// Admission, caching, scheduling, and classified retry, orchestrated.
#[cfg(feature = "pipeline")]
pub mod pipeline {
    pub use adgate_pipeline::*;
}
