//! Priority-weighted fair dispatch for admitted operations.
//!
//! A [`PriorityScheduler`] is a fixed-size pool of worker tasks draining a
//! single priority queue. Priority is derived from a tenant's SLA tier and
//! a caller-supplied urgency, matching
//! `original_source/core/scheduler.py::PriorityScheduler`: lower priority
//! numbers run first, so Gold tenants and high-urgency requests jump the
//! queue ahead of routine Bronze traffic without starving it outright.
//!
//! ```no_run
//! use adgate_scheduler::PriorityScheduler;
//! use adgate_core::Tier;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let scheduler = Arc::new(PriorityScheduler::builder().workers(4).build());
//! scheduler.start().await;
//!
//! scheduler.submit("acme", Tier::Gold, 80, Box::pin(async {
//!     // do the work
//! }));
//!
//! scheduler.stop(Duration::from_secs(5)).await;
//! # }
//! ```

mod config;
mod events;
mod operation;
mod priority;
mod scheduler;
mod stats;

pub use config::{SchedulerConfig, SchedulerConfigBuilder};
pub use events::SchedulerEvent;
pub use operation::QueuedOperation;
pub use priority::compute_priority;
pub use scheduler::PriorityScheduler;
pub use stats::SchedulerStats;
