//! Quota Governor: centralized admission and accounting against a shared
//! store that may be contended by peer processes.
//!
//! # When to Use
//!
//! Put a [`QuotaGovernor`] in front of any fan-in to a rate- or
//! budget-constrained upstream API shared by multiple tenants. It answers
//! "can this tenant's operation proceed right now" and separately tracks
//! "how much of the shared and per-tenant budget has this operation used".
//!
//! # Example
//!
//! ```
//! use adgate_core::{MemoryStore, Tier};
//! use adgate_quota::QuotaGovernor;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let governor = QuotaGovernor::builder(Arc::new(MemoryStore::new())).build();
//! governor.reset_global(10_000).await;
//! governor.set_client_quota("acme", 500).await;
//!
//! assert!(governor.can_run("acme", 100, Tier::Bronze).await);
//! governor.charge("acme", 100).await;
//! # }
//! ```

mod config;
mod events;
mod governor;
mod status;

pub use config::{QuotaGovernorConfig, QuotaGovernorConfigBuilder};
pub use events::QuotaEvent;
pub use governor::QuotaGovernor;
pub use status::{ClientQuotaStatus, QuotaStatus};
