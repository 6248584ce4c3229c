use adgate_core::Tier;

/// Snapshot of the global quota, as returned by `QuotaGovernor::quota_status`.
///
/// On a store error every field falls back to its safe default (all-zero
/// usage), matching `original_source/core/quota.py::get_quota_status`'s
/// fail-open behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaStatus {
    pub global_remaining: i64,
    pub global_daily: i64,
    pub global_used: i64,
    pub global_used_percent: f64,
}

impl QuotaStatus {
    pub(crate) fn from_counters(global_daily: i64, global_remaining: i64) -> Self {
        let global_used = (global_daily - global_remaining).max(0);
        let global_used_percent = if global_daily > 0 {
            (global_used as f64 / global_daily as f64) * 100.0
        } else {
            0.0
        };
        Self {
            global_remaining,
            global_daily,
            global_used,
            global_used_percent,
        }
    }
}

/// Snapshot of a single tenant's quota standing.
///
/// On a store error, falls back to `remaining: 0`, `tier: Tier::default()`
/// (Bronze), `paused: false` — matching
/// `original_source/core/quota.py::get_client_quota_status`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientQuotaStatus {
    pub client_id: String,
    pub remaining: i64,
    pub tier: Tier,
    pub paused: bool,
}

impl ClientQuotaStatus {
    pub(crate) fn fallback(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            remaining: 0,
            tier: Tier::default(),
            paused: false,
        }
    }
}
