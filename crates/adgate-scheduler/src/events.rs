use adgate_core::{ResilienceEvent, Tier};
use std::time::{Duration, Instant};

/// Events emitted by a [`crate::PriorityScheduler`] for observability.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// An operation was accepted onto the queue.
    Submitted {
        name: String,
        timestamp: Instant,
        tenant: String,
        tier: Tier,
        priority: i64,
    },
    /// A worker dequeued and ran an operation to completion without
    /// panicking.
    Completed {
        name: String,
        timestamp: Instant,
        tenant: String,
        duration: Duration,
    },
    /// A worker's operation panicked; the panic was caught and counted.
    Failed {
        name: String,
        timestamp: Instant,
        tenant: String,
        duration: Duration,
    },
}

impl ResilienceEvent for SchedulerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SchedulerEvent::Submitted { .. } => "scheduler_submitted",
            SchedulerEvent::Completed { .. } => "scheduler_completed",
            SchedulerEvent::Failed { .. } => "scheduler_failed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            SchedulerEvent::Submitted { timestamp, .. }
            | SchedulerEvent::Completed { timestamp, .. }
            | SchedulerEvent::Failed { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            SchedulerEvent::Submitted { name, .. }
            | SchedulerEvent::Completed { name, .. }
            | SchedulerEvent::Failed { name, .. } => name,
        }
    }
}
