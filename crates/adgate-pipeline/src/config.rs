//! Pipeline configuration, following the same fluent builder convention as
//! the other crates' `*ConfigBuilder`s.

use crate::events::PipelineEvent;
use adgate_core::{EventListeners, FnListener};
use std::time::Duration;

/// Default quota cost of a read (`execute_read`), matching
/// `google_ads_manager.py::execute_gaql`'s `quota_units = 10`.
pub const DEFAULT_COST_READ: i64 = 10;
/// Default quota cost per mutate operation, matching
/// `execute_mutate`'s `quota_units = 50 * len(request.operations)`.
pub const DEFAULT_COST_WRITE: i64 = 50;
/// Default urgency for reads, matching `execute_gaql`'s `urgency: int = 50`.
pub const DEFAULT_READ_URGENCY: u8 = 50;
/// Default urgency for mutates, matching `execute_mutate`'s
/// `urgency: int = 70`.
pub const DEFAULT_MUTATE_URGENCY: u8 = 70;

pub struct PipelineConfig {
    pub(crate) name: String,
    pub(crate) cost_read: i64,
    pub(crate) cost_write: i64,
    pub(crate) completion_timeout: Duration,
    pub(crate) max_attempts: u32,
    pub(crate) backoff_initial: Duration,
    pub(crate) backoff_max: Duration,
    pub(crate) event_listeners: EventListeners<PipelineEvent>,
}

pub struct PipelineConfigBuilder {
    name: String,
    cost_read: i64,
    cost_write: i64,
    completion_timeout: Duration,
    max_attempts: u32,
    backoff_initial: Duration,
    backoff_max: Duration,
    event_listeners: EventListeners<PipelineEvent>,
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            name: String::from("<unnamed>"),
            cost_read: DEFAULT_COST_READ,
            cost_write: DEFAULT_COST_WRITE,
            // `_execute_operation`'s `wait_for_completion(timeout=120.0)`.
            completion_timeout: Duration::from_secs(120),
            max_attempts: 3,
            backoff_initial: Duration::from_secs(1),
            backoff_max: Duration::from_secs(10),
            event_listeners: EventListeners::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn cost_read(mut self, units: i64) -> Self {
        self.cost_read = units;
        self
    }

    pub fn cost_write(mut self, units: i64) -> Self {
        self.cost_write = units;
        self
    }

    pub fn completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.backoff_initial = initial;
        self.backoff_max = max;
        self
    }

    pub fn on_retry<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, PipelineEvent::Retrying { .. }) {
                f();
            }
        }));
        self
    }

    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, PipelineEvent::Succeeded { .. }) {
                f();
            }
        }));
        self
    }

    pub fn on_exhausted<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, PipelineEvent::Exhausted { .. }) {
                f();
            }
        }));
        self
    }

    pub fn build(self) -> PipelineConfig {
        PipelineConfig {
            name: self.name,
            cost_read: self.cost_read,
            cost_write: self.cost_write,
            completion_timeout: self.completion_timeout,
            max_attempts: self.max_attempts,
            backoff_initial: self.backoff_initial,
            backoff_max: self.backoff_max,
            event_listeners: self.event_listeners,
        }
    }
}
