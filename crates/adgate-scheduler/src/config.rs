//! Configuration for the priority scheduler, via a fluent builder.

use crate::events::SchedulerEvent;
use crate::scheduler::PriorityScheduler;
use adgate_core::{EventListeners, FnListener};
use std::time::Duration;

pub struct SchedulerConfig {
    pub(crate) workers: usize,
    pub(crate) name: String,
    pub(crate) dequeue_poll_interval: Duration,
    pub(crate) aging_interval: Option<Duration>,
    pub(crate) event_listeners: EventListeners<SchedulerEvent>,
}

pub struct SchedulerConfigBuilder {
    workers: usize,
    name: String,
    dequeue_poll_interval: Duration,
    aging_interval: Option<Duration>,
    event_listeners: EventListeners<SchedulerEvent>,
}

impl Default for SchedulerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerConfigBuilder {
    pub fn new() -> Self {
        Self {
            workers: 8,
            name: String::from("<unnamed>"),
            dequeue_poll_interval: Duration::from_millis(200),
            aging_interval: None,
            event_listeners: EventListeners::new(),
        }
    }

    /// Number of concurrent worker tasks draining the queue.
    ///
    /// Default: `8`, matching
    /// `original_source/core/scheduler.py::PriorityScheduler.__init__`.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// How long a worker waits on an empty queue before re-checking the
    /// shutdown flag. This only bounds how quickly `stop()` is observed by
    /// idle workers.
    pub fn dequeue_poll_interval(mut self, interval: Duration) -> Self {
        self.dequeue_poll_interval = interval;
        self
    }

    /// Enables priority aging: on dequeue, an operation's effective
    /// priority is reduced by one step per `interval` of age, so a starved
    /// low-tier operation eventually out-prioritizes a continuous stream
    /// of fresh high-tier ones. Left disabled (`None`) by default.
    pub fn aging_interval(mut self, interval: Duration) -> Self {
        self.aging_interval = Some(interval);
        self
    }

    pub fn on_submit<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, SchedulerEvent::Submitted { .. }) {
                f();
            }
        }));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, SchedulerEvent::Completed { .. }) {
                f();
            }
        }));
        self
    }

    pub fn on_fail<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if matches!(event, SchedulerEvent::Failed { .. }) {
                f();
            }
        }));
        self
    }

    pub fn build(self) -> PriorityScheduler {
        let config = SchedulerConfig {
            workers: self.workers,
            name: self.name,
            dequeue_poll_interval: self.dequeue_poll_interval,
            aging_interval: self.aging_interval,
            event_listeners: self.event_listeners,
        };
        PriorityScheduler::new(config)
    }
}
