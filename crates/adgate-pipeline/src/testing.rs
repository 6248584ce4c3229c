//! A fake [`UpstreamApi`] for tests, carried forward from
//! `original_source/core/google_ads_manager.py::MockGoogleAdsClient`.

use crate::upstream::{MutateResponse, MutateResult, Record, UpstreamApi};
use adgate_core::Error;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};

/// Returns canned search/mutate responses, optionally failing the first
/// `N` calls with a retry-eligible `RateLimit` error — useful for
/// exercising [`crate::retry::classified_retry`] without a live upstream.
pub struct MockUpstream {
    fail_first_n: u32,
    calls: AtomicU32,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self {
            fail_first_n: 0,
            calls: AtomicU32::new(0),
        }
    }

    /// Fails the first `n` calls (to either `search` or `mutate`) with a
    /// `RateLimit` error before succeeding.
    pub fn flaky(n: u32) -> Self {
        Self {
            fail_first_n: n,
            calls: AtomicU32::new(0),
        }
    }

    fn maybe_fail(&self) -> Result<(), Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first_n {
            return Err(Error::rate_limit("mock upstream throttled"));
        }
        Ok(())
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamApi for MockUpstream {
    async fn search(&self, customer_id: &str, query: &str, _page_size: u32) -> Result<Vec<Record>, Error> {
        self.maybe_fail()?;
        let _ = query;
        let mut row = Record::new();
        row.insert(
            "campaign".to_string(),
            json!({"id": "123456789", "name": "Mock Campaign", "status": "ENABLED"}),
        );
        row.insert(
            "metrics".to_string(),
            json!({"impressions": 1000, "clicks": 50, "cost_micros": 5_000_000}),
        );
        let _ = customer_id;
        Ok(vec![row])
    }

    async fn mutate(
        &self,
        customer_id: &str,
        operations: &[Value],
        validate_only: bool,
    ) -> Result<MutateResponse, Error> {
        self.maybe_fail()?;
        let _ = validate_only;
        let results = (0..operations.len())
            .map(|i| MutateResult {
                resource_name: format!("customers/{customer_id}/campaigns/{i}"),
                operation_id: i.to_string(),
            })
            .collect();
        Ok(MutateResponse {
            results,
            partial_failure_error: None,
        })
    }
}
