//! `OperationPipeline`: the orchestrator tying admission, caching,
//! scheduling, and classified retry together, grounded on
//! `original_source/core/google_ads_manager.py::GoogleAdsManager`.
//!
//! The submission/await-completion coupling follows
//! `_execute_operation`'s `scheduler.submit(wrapped_operation)` +
//! `scheduler.wait_for_completion(timeout=120.0)` pair, but rather than a
//! separate "wait for the whole scheduler to go idle" call (which would
//! block on unrelated tenants' work too), each submission here closes over
//! its own `tokio::sync::oneshot` channel — the receiver *is* the completion
//! handle, just constructed per-call instead of exposed as a named type.
//!
//! Charging happens only on success, and a failed attempt is never
//! refunded — matching `_execute_operation`, which logs the exception and
//! nothing else (see `DESIGN.md`'s Open Question resolution and
//! `QuotaGovernor::refund`'s doc comment).

use crate::backoff::Jittered;
use crate::config::{PipelineConfig, PipelineConfigBuilder};
use crate::events::PipelineEvent;
use crate::retry::classified_retry;
use crate::upstream::{MutateResponse, Record, UpstreamApi};
use adgate_cache::TwoTierCache;
use adgate_core::{Error, SharedStore};
use adgate_quota::QuotaGovernor;
use adgate_scheduler::PriorityScheduler;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;

#[cfg(feature = "tracing")]
use tracing::{info, warn};

/// A GAQL-style read request, mirroring
/// `google_ads_manager.py::GAQLRequest`.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub client_id: String,
    pub query: String,
    pub page_size: u32,
    pub cache_enabled: bool,
    pub service_type: String,
}

impl ReadRequest {
    pub fn new(client_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            query: query.into(),
            page_size: 1000,
            cache_enabled: true,
            service_type: "reporting".to_string(),
        }
    }
}

/// A mutate request, mirroring `google_ads_manager.py::MutateRequest`.
#[derive(Debug, Clone)]
pub struct MutateRequest {
    pub client_id: String,
    pub operation_type: String,
    pub operations: Vec<Value>,
    pub validate_only: bool,
}

impl MutateRequest {
    pub fn new(client_id: impl Into<String>, operation_type: impl Into<String>, operations: Vec<Value>) -> Self {
        Self {
            client_id: client_id.into(),
            operation_type: operation_type.into(),
            operations,
            validate_only: false,
        }
    }
}

pub struct OperationPipeline<S, U> {
    quota: Arc<QuotaGovernor<S>>,
    cache: Arc<TwoTierCache<S>>,
    scheduler: Arc<PriorityScheduler>,
    upstream: Arc<U>,
    config: PipelineConfig,
}

impl<S, U> OperationPipeline<S, U>
where
    S: SharedStore + 'static,
    U: UpstreamApi + 'static,
{
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    pub fn new(
        quota: Arc<QuotaGovernor<S>>,
        cache: Arc<TwoTierCache<S>>,
        scheduler: Arc<PriorityScheduler>,
        upstream: Arc<U>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            quota,
            cache,
            scheduler,
            upstream,
            config,
        }
    }

    fn backoff(&self) -> Jittered {
        Jittered::new(self.config.backoff_initial, self.config.backoff_max)
    }

    fn cache_params(query: &str, page_size: u32) -> Vec<(&'static str, String)> {
        vec![("query", query.to_string()), ("page_size", page_size.to_string())]
    }

    /// Executes a GAQL-style read: cache lookup, tier/pause check, admission,
    /// scheduler dispatch with classified retry, then a cache write on
    /// success. See the module docs for the full step ordering.
    pub async fn execute_read(&self, request: ReadRequest, urgency: u8) -> Result<Vec<Record>, Error> {
        let owned_params = Self::cache_params(&request.query, request.page_size);
        let params: Vec<(&str, &str)> = owned_params.iter().map(|(k, v)| (*k, v.as_str())).collect();

        if request.cache_enabled {
            if let Some(cached) = self.cache.get(&request.client_id, "gaql", &params).await {
                #[cfg(feature = "tracing")]
                info!(tenant = %request.client_id, "cache hit for GAQL query");
                return serde_json::from_value(cached)
                    .map_err(|e| Error::internal(format!("corrupt cache entry: {e}")));
            }
        }

        let tier = self.quota.tier(&request.client_id).await;
        if self.quota.is_paused(&request.client_id).await {
            return Err(Error::quota(format!("client {} is paused", request.client_id)));
        }

        let cost = self.config.cost_read;
        if !self.quota.can_run(&request.client_id, cost, tier).await {
            return Err(Error::quota("insufficient quota for GAQL query"));
        }

        let (tx, rx) = oneshot::channel();
        let upstream = Arc::clone(&self.upstream);
        let quota = Arc::clone(&self.quota);
        let name = self.config.name.clone();
        let tenant = request.client_id.clone();
        let max_attempts = self.config.max_attempts;
        let backoff = self.backoff();
        let customer_id = request.client_id.clone();
        let query = request.query.clone();
        let page_size = request.page_size;
        let listeners = self.config.event_listeners.clone();

        self.scheduler.submit(
            request.client_id.clone(),
            tier,
            urgency,
            Box::pin(async move {
                let result = classified_retry(&name, &tenant, max_attempts, backoff, &listeners, || {
                    let upstream = Arc::clone(&upstream);
                    let customer_id = customer_id.clone();
                    let query = query.clone();
                    async move { upstream.search(&customer_id, &query, page_size).await }
                })
                .await;

                if result.is_ok() {
                    quota.charge(&tenant, cost).await;
                }
                let _ = tx.send(result);
            }),
        );

        let records = self.await_completion(rx).await?;

        if request.cache_enabled {
            let value = serde_json::to_value(&records).map_err(|e| Error::internal(e.to_string()))?;
            self.cache
                .set(&request.client_id, "gaql", &params, &request.service_type, &value)
                .await;
        }

        Ok(records)
    }

    /// Executes a mutate operation. Same shape as [`Self::execute_read`]
    /// minus any cache interaction, matching `execute_mutate`.
    pub async fn execute_mutate(&self, request: MutateRequest, urgency: u8) -> Result<MutateResponse, Error> {
        let tier = self.quota.tier(&request.client_id).await;
        if self.quota.is_paused(&request.client_id).await {
            return Err(Error::quota(format!("client {} is paused", request.client_id)));
        }

        let cost = self.config.cost_write * request.operations.len() as i64;
        if !self.quota.can_run(&request.client_id, cost, tier).await {
            return Err(Error::quota("insufficient quota for mutate operation"));
        }

        let (tx, rx) = oneshot::channel();
        let upstream = Arc::clone(&self.upstream);
        let quota = Arc::clone(&self.quota);
        let name = self.config.name.clone();
        let tenant = request.client_id.clone();
        let max_attempts = self.config.max_attempts;
        let backoff = self.backoff();
        let customer_id = request.client_id.clone();
        let operations = request.operations.clone();
        let validate_only = request.validate_only;
        let listeners = self.config.event_listeners.clone();

        self.scheduler.submit(
            request.client_id.clone(),
            tier,
            urgency,
            Box::pin(async move {
                let result = classified_retry(&name, &tenant, max_attempts, backoff, &listeners, || {
                    let upstream = Arc::clone(&upstream);
                    let customer_id = customer_id.clone();
                    let operations = operations.clone();
                    async move { upstream.mutate(&customer_id, &operations, validate_only).await }
                })
                .await;

                if result.is_ok() {
                    quota.charge(&tenant, cost).await;
                }
                let _ = tx.send(result);
            }),
        );

        self.await_completion(rx).await
    }

    async fn await_completion<T>(&self, rx: oneshot::Receiver<Result<T, Error>>) -> Result<T, Error> {
        match tokio::time::timeout(self.config.completion_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_recv_error)) => Err(Error::internal("operation worker dropped without a result")),
            Err(_elapsed) => {
                #[cfg(feature = "tracing")]
                warn!(pipeline = %self.config.name, "operation timed out waiting for completion");
                Err(Error::timeout("operation did not complete within the configured timeout"))
            }
        }
    }

    pub fn event_listeners(&self) -> &adgate_core::EventListeners<PipelineEvent> {
        &self.config.event_listeners
    }
}
