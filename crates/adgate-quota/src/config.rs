//! Configuration for the Quota Governor, via a fluent builder.

use crate::events::QuotaEvent;
use crate::governor::QuotaGovernor;
use adgate_core::{EventListeners, FnListener, SharedStore};
use std::sync::Arc;

pub struct QuotaGovernorConfig {
    pub(crate) bronze_reserve_threshold: f64,
    pub(crate) name: String,
    pub(crate) event_listeners: EventListeners<QuotaEvent>,
}

pub struct QuotaGovernorConfigBuilder<S> {
    store: Arc<S>,
    bronze_reserve_threshold: f64,
    name: String,
    event_listeners: EventListeners<QuotaEvent>,
}

impl<S> QuotaGovernorConfigBuilder<S>
where
    S: SharedStore + 'static,
{
    pub(crate) fn new(store: Arc<S>) -> Self {
        Self {
            store,
            bronze_reserve_threshold: 0.15,
            name: String::from("<unnamed>"),
            event_listeners: EventListeners::new(),
        }
    }

    /// Fraction of `global_daily` below which Bronze-tier admissions are
    /// refused. Default: `0.15`, matching
    /// `original_source/core/quota.py::BRONZE_RESERVE_THRESHOLD`.
    pub fn bronze_reserve_threshold(mut self, threshold: f64) -> Self {
        self.bronze_reserve_threshold = threshold;
        self
    }

    /// Name of this governor instance for observability.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Called whenever `can_run` refuses an admission.
    pub fn on_admission_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, QuotaEvent::AdmissionRejected { .. }) {
                f();
            }
        }));
        self
    }

    /// Called whenever `charge` runs (success or store error).
    pub fn on_charge<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, QuotaEvent::Charged { .. }) {
                f();
            }
        }));
        self
    }

    pub fn build(self) -> QuotaGovernor<S> {
        let config = QuotaGovernorConfig {
            bronze_reserve_threshold: self.bronze_reserve_threshold,
            name: self.name,
            event_listeners: self.event_listeners,
        };
        QuotaGovernor::new(self.store, config)
    }
}
