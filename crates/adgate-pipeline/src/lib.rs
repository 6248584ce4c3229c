//! Orchestrates admission, caching, scheduling, and classified retry around
//! an injected upstream capability.
//!
//! [`OperationPipeline`] is the single entry point a caller drives:
//! [`OperationPipeline::execute_read`] and [`OperationPipeline::execute_mutate`]
//! each run the full admission-and-dispatch sequence described in
//! `original_source/core/google_ads_manager.py::GoogleAdsManager` — cache
//! check, tier/pause resolution, quota admission, scheduler submission,
//! classified retry around the actual upstream call, and (for reads) a
//! cache write on success.
//!
//! ```no_run
//! use adgate_pipeline::{OperationPipeline, ReadRequest};
//! use adgate_quota::QuotaGovernor;
//! use adgate_cache::TwoTierCache;
//! use adgate_scheduler::PriorityScheduler;
//! use adgate_core::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example(upstream: Arc<impl adgate_pipeline::UpstreamApi + 'static>) {
//! let store = Arc::new(MemoryStore::new());
//! let quota = Arc::new(QuotaGovernor::builder(Arc::clone(&store)).build());
//! let cache = Arc::new(TwoTierCache::builder(Arc::clone(&store)).build());
//! let scheduler = Arc::new(PriorityScheduler::builder().build());
//! scheduler.start().await;
//!
//! let pipeline = OperationPipeline::new(
//!     quota,
//!     cache,
//!     scheduler,
//!     upstream,
//!     OperationPipeline::<MemoryStore, _>::builder().build(),
//! );
//!
//! let result = pipeline.execute_read(ReadRequest::new("acme", "SELECT campaign.id FROM campaign"), 50).await;
//! # let _ = result;
//! # }
//! ```

mod backoff;
mod config;
mod events;
mod pipeline;
mod retry;
mod upstream;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backoff::Jittered;
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use events::PipelineEvent;
pub use pipeline::{MutateRequest, OperationPipeline, ReadRequest};
pub use retry::{classified_retry, is_retry_eligible};
pub use upstream::{MutateResponse, MutateResult, Record, UpstreamApi};
