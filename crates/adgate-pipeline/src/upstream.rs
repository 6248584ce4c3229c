//! The injected upstream-API capability, grounded on
//! `original_source/core/google_ads_manager.py`'s `client.search`/
//! `client.mutate` calls (and, before that error mapping, whatever raw
//! client the real Google Ads SDK would provide).

use adgate_core::Error;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// A single result row from a [`UpstreamApi::search`] call. Left as a loose
/// `serde_json::Value`-backed map rather than a fixed schema since GAQL-style
/// query results are themselves schema-driven by the query, not by this
/// system.
pub type Record = HashMap<String, Value>;

/// The response of a [`UpstreamApi::mutate`] call, mirroring
/// `MockGoogleAdsClient.mutate`'s `{results, partial_failure_error}` shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MutateResponse {
    pub results: Vec<MutateResult>,
    pub partial_failure_error: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MutateResult {
    pub resource_name: String,
    pub operation_id: String,
}

/// The capability the Operation Pipeline drives: a read (`search`) and a
/// write (`mutate`) entry point, each allowed to fail with a typed [`Error`]
/// — real implementations are expected to translate whatever their
/// underlying client raises through [`Error::map_upstream`].
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    async fn search(&self, customer_id: &str, query: &str, page_size: u32) -> Result<Vec<Record>, Error>;

    async fn mutate(
        &self,
        customer_id: &str,
        operations: &[Value],
        validate_only: bool,
    ) -> Result<MutateResponse, Error>;
}
