//! The `QuotaGovernor` itself: admission decisions and balance accounting
//! against a [`SharedStore`], grounded directly on
//! `original_source/core/quota.py`'s `QuotaGovernor` class.
//!
//! Key schema (mirrors the Python original's Redis key names):
//! - `quota:global_daily` — the configured daily ceiling
//! - `quota:global_remaining` — units left today, shared across all tenants
//! - `quota:client:{tenant}:remaining` — units left today for one tenant
//! - `client:{tenant}:tier` — the tenant's SLA tier (`gold`/`silver`/`bronze`)
//! - `client:{tenant}:paused` — presence means the tenant is paused
//!
//! Every read falls back to a permissive default on a store error ("fail
//! open"), and every write swallows the error after emitting an event with
//! `store_error: true` — admission control degrading to allow-everything
//! beats an outage in the shared store taking down the whole fleet.

use crate::config::{QuotaGovernorConfig, QuotaGovernorConfigBuilder};
use crate::events::{AdmissionRejectedReason, QuotaEvent};
use crate::status::{ClientQuotaStatus, QuotaStatus};
use adgate_core::{SharedStore, Tier};
use std::sync::Arc;
use std::time::Instant;

const GLOBAL_DAILY_KEY: &str = "quota:global_daily";
const GLOBAL_REMAINING_KEY: &str = "quota:global_remaining";

fn client_remaining_key(client_id: &str) -> String {
    format!("quota:client:{client_id}:remaining")
}

fn client_tier_key(client_id: &str) -> String {
    format!("client:{client_id}:tier")
}

fn client_paused_key(client_id: &str) -> String {
    format!("client:{client_id}:paused")
}

pub struct QuotaGovernor<S> {
    store: Arc<S>,
    config: QuotaGovernorConfig,
}

impl<S> QuotaGovernor<S>
where
    S: SharedStore + 'static,
{
    /// Starts a fluent [`QuotaGovernorConfigBuilder`] backed by `store`.
    pub fn builder(store: Arc<S>) -> QuotaGovernorConfigBuilder<S> {
        QuotaGovernorConfigBuilder::new(store)
    }

    pub(crate) fn new(store: Arc<S>, config: QuotaGovernorConfig) -> Self {
        Self { store, config }
    }

    async fn get_int_fail_open(&self, key: &str, default: i64) -> i64 {
        self.store.get_int(key, default).await.unwrap_or(default)
    }

    fn emit(&self, event: QuotaEvent) {
        self.config.event_listeners.emit(&event);
    }

    /// Returns whether `client_id` may run an operation costing `cost`
    /// units. Checks, in order: the tenant isn't paused, the tenant has
    /// enough remaining balance, the global budget has enough remaining
    /// balance (for every tier, not just Bronze), and — for `Tier::Bronze`
    /// tenants only — that the global remaining balance isn't already
    /// below `bronze_reserve_threshold` of the daily ceiling.
    pub async fn can_run(&self, client_id: &str, cost: i64, tier: Tier) -> bool {
        let timestamp = Instant::now();

        if self.is_paused(client_id).await {
            self.emit(QuotaEvent::AdmissionRejected {
                name: self.config.name.clone(),
                timestamp,
                tenant: client_id.to_string(),
                tier,
                reason: AdmissionRejectedReason::ClientPaused,
            });
            return false;
        }

        let client_remaining = self.get_int_fail_open(&client_remaining_key(client_id), 0).await;
        if client_remaining < cost {
            self.emit(QuotaEvent::AdmissionRejected {
                name: self.config.name.clone(),
                timestamp,
                tenant: client_id.to_string(),
                tier,
                reason: AdmissionRejectedReason::InsufficientBalance,
            });
            return false;
        }

        let global_remaining = self.get_int_fail_open(GLOBAL_REMAINING_KEY, 0).await;
        if global_remaining < cost {
            self.emit(QuotaEvent::AdmissionRejected {
                name: self.config.name.clone(),
                timestamp,
                tenant: client_id.to_string(),
                tier,
                reason: AdmissionRejectedReason::GlobalBudgetExhausted,
            });
            return false;
        }

        if tier == Tier::Bronze {
            let global_daily = self.get_int_fail_open(GLOBAL_DAILY_KEY, 1).await;
            let reserve = global_daily as f64 * self.config.bronze_reserve_threshold;
            if (global_remaining as f64) < reserve {
                self.emit(QuotaEvent::AdmissionRejected {
                    name: self.config.name.clone(),
                    timestamp,
                    tenant: client_id.to_string(),
                    tier,
                    reason: AdmissionRejectedReason::BronzeReserveThreshold,
                });
                return false;
            }
        }

        self.emit(QuotaEvent::AdmissionGranted {
            name: self.config.name.clone(),
            timestamp,
            tenant: client_id.to_string(),
        });
        true
    }

    /// Deducts `units` from both the global and the tenant's remaining
    /// balance in a single round-trip. Fails open: a store error is logged
    /// via the emitted event (`store_error: true`) rather than propagated.
    pub async fn charge(&self, client_id: &str, units: i64) {
        let result = self
            .store
            .decr_by_pair(GLOBAL_REMAINING_KEY, &client_remaining_key(client_id), units)
            .await;
        self.emit(QuotaEvent::Charged {
            name: self.config.name.clone(),
            timestamp: Instant::now(),
            tenant: client_id.to_string(),
            units,
            store_error: result.is_err(),
        });
    }

    /// Credits `units` back to both the global and the tenant's remaining
    /// balance. Note: the pipeline never calls this automatically on a
    /// failed operation — `original_source/core/google_ads_manager.py`'s
    /// `_execute_operation` only logs on exception and never refunds, so
    /// this is exposed for callers with their own compensating-transaction
    /// needs, not wired into `adgate-pipeline`'s retry/error path.
    pub async fn refund(&self, client_id: &str, units: i64) {
        let result = self
            .store
            .incr_by_pair(GLOBAL_REMAINING_KEY, &client_remaining_key(client_id), units)
            .await;
        self.emit(QuotaEvent::Refunded {
            name: self.config.name.clone(),
            timestamp: Instant::now(),
            tenant: client_id.to_string(),
            units,
            store_error: result.is_err(),
        });
    }

    /// The tenant's configured SLA tier, defaulting to `Tier::Bronze` if
    /// unset or on a store error.
    pub async fn tier(&self, client_id: &str) -> Tier {
        match self.store.get_str(&client_tier_key(client_id)).await {
            Ok(Some(raw)) => Tier::parse(&raw).unwrap_or_default(),
            _ => Tier::default(),
        }
    }

    pub async fn set_tier(&self, client_id: &str, tier: Tier) {
        let _ = self
            .store
            .set_str(&client_tier_key(client_id), tier.as_str().to_string())
            .await;
    }

    pub async fn is_paused(&self, client_id: &str) -> bool {
        matches!(
            self.store.get_str(&client_paused_key(client_id)).await,
            Ok(Some(_))
        )
    }

    pub async fn pause(&self, client_id: &str) {
        let _ = self
            .store
            .set_str(&client_paused_key(client_id), "1".to_string())
            .await;
    }

    pub async fn resume(&self, client_id: &str) {
        let _ = self.store.delete(&client_paused_key(client_id)).await;
    }

    /// Resets the global daily ceiling and remaining balance to
    /// `daily_limit`. Call once per billing day (or in tests, once per
    /// scenario).
    pub async fn reset_global(&self, daily_limit: i64) {
        let _ = self.store.set_int(GLOBAL_DAILY_KEY, daily_limit).await;
        let _ = self.store.set_int(GLOBAL_REMAINING_KEY, daily_limit).await;
    }

    /// Sets `client_id`'s remaining balance for the day.
    pub async fn set_client_quota(&self, client_id: &str, limit: i64) {
        let _ = self
            .store
            .set_int(&client_remaining_key(client_id), limit)
            .await;
    }

    pub async fn quota_status(&self) -> QuotaStatus {
        let global_daily = self.get_int_fail_open(GLOBAL_DAILY_KEY, 0).await;
        let global_remaining = self.get_int_fail_open(GLOBAL_REMAINING_KEY, 0).await;
        QuotaStatus::from_counters(global_daily, global_remaining)
    }

    pub async fn client_quota_status(&self, client_id: &str) -> ClientQuotaStatus {
        let remaining = match self.store.get_int(&client_remaining_key(client_id), 0).await {
            Ok(value) => value,
            Err(_) => return ClientQuotaStatus::fallback(client_id),
        };
        let tier = self.tier(client_id).await;
        let paused = self.is_paused(client_id).await;
        ClientQuotaStatus {
            client_id: client_id.to_string(),
            remaining,
            tier,
            paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgate_core::MemoryStore;

    fn governor() -> QuotaGovernor<MemoryStore> {
        QuotaGovernor::builder(Arc::new(MemoryStore::new())).build()
    }

    #[tokio::test]
    async fn grants_when_balance_and_global_reserve_allow() {
        let governor = governor();
        governor.reset_global(1000).await;
        governor.set_client_quota("acme", 500).await;

        assert!(governor.can_run("acme", 100, Tier::Bronze).await);
    }

    #[tokio::test]
    async fn rejects_when_client_balance_insufficient() {
        let governor = governor();
        governor.reset_global(1000).await;
        governor.set_client_quota("acme", 50).await;

        assert!(!governor.can_run("acme", 100, Tier::Gold).await);
    }

    #[tokio::test]
    async fn gold_tier_is_rejected_when_global_budget_is_exhausted() {
        let governor = governor();
        governor.reset_global(1000).await;
        governor.set_client_quota("acme", 1000).await;
        governor.set_client_quota("other", 1000).await;
        governor.charge("other", 995).await; // global_remaining now 5

        assert!(!governor.can_run("acme", 100, Tier::Gold).await);
    }

    #[tokio::test]
    async fn bronze_tier_is_refused_inside_the_reserve_band() {
        let governor = governor();
        governor.reset_global(1000).await;
        governor.set_client_quota("acme", 1000).await;
        governor.charge("acme", 900).await; // global_remaining now 100 (10%)

        assert!(!governor.can_run("acme", 10, Tier::Bronze).await);
        // Gold is exempt from the reserve throttle.
        assert!(governor.can_run("acme", 10, Tier::Gold).await);
    }

    #[tokio::test]
    async fn paused_client_is_always_rejected() {
        let governor = governor();
        governor.reset_global(1000).await;
        governor.set_client_quota("acme", 500).await;
        governor.pause("acme").await;

        assert!(!governor.can_run("acme", 1, Tier::Gold).await);
        governor.resume("acme").await;
        assert!(governor.can_run("acme", 1, Tier::Gold).await);
    }

    #[tokio::test]
    async fn charge_and_refund_are_symmetric() {
        let governor = governor();
        governor.reset_global(1000).await;
        governor.set_client_quota("acme", 500).await;

        governor.charge("acme", 100).await;
        let status = governor.client_quota_status("acme").await;
        assert_eq!(status.remaining, 400);

        governor.refund("acme", 100).await;
        let status = governor.client_quota_status("acme").await;
        assert_eq!(status.remaining, 500);
    }

    #[tokio::test]
    async fn tier_defaults_to_bronze_until_set() {
        let governor = governor();
        assert_eq!(governor.tier("acme").await, Tier::Bronze);
        governor.set_tier("acme", Tier::Gold).await;
        assert_eq!(governor.tier("acme").await, Tier::Gold);
    }

    #[tokio::test]
    async fn quota_status_reports_usage_percent() {
        let governor = governor();
        governor.reset_global(1000).await;
        governor.set_client_quota("acme", 1000).await;
        governor.charge("acme", 250).await;

        let status = governor.quota_status().await;
        assert_eq!(status.global_used, 250);
        assert!((status.global_used_percent - 25.0).abs() < 1e-9);
    }
}
