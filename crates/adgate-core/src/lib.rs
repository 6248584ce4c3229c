//! Shared infrastructure for the adgate admission-and-dispatch pipeline.
//!
//! This crate provides the pieces every other `adgate-*` crate depends on:
//! - the error taxonomy (`error`)
//! - an observability event bus (`events`)
//! - the `Tier` attribute shared by quota, cache, and scheduling decisions
//! - the `SharedStore` trait that abstracts over the distributed key-value
//!   store backing both the Quota Governor and the Two-Tier Cache's shared
//!   tier, plus an in-memory implementation for tests and a Redis-backed one
//!   for production (feature `redis`).

pub mod error;
pub mod events;
mod store;
mod tier;

#[cfg(feature = "redis")]
pub mod redis_store;

pub use error::{Error, ErrorKind};
pub use events::{EventListener, EventListeners, FnListener, ResilienceEvent};
pub use store::{MemoryStore, SharedStore, StoreError, StoreResult};
pub use tier::Tier;

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
