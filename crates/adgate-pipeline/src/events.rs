use adgate_core::{ErrorKind, ResilienceEvent};
use std::time::{Duration, Instant};

/// Events emitted by the classified retry wrapper and the pipeline itself.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A retryable error was observed and another attempt will follow.
    Retrying {
        name: String,
        timestamp: Instant,
        tenant: String,
        attempt: u32,
        kind: ErrorKind,
        delay: Duration,
    },
    /// The call succeeded, possibly after retries.
    Succeeded {
        name: String,
        timestamp: Instant,
        tenant: String,
        attempts: u32,
    },
    /// Every attempt was exhausted, or the error wasn't eligible for retry.
    Exhausted {
        name: String,
        timestamp: Instant,
        tenant: String,
        attempts: u32,
        kind: ErrorKind,
    },
}

impl ResilienceEvent for PipelineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PipelineEvent::Retrying { .. } => "pipeline_retrying",
            PipelineEvent::Succeeded { .. } => "pipeline_succeeded",
            PipelineEvent::Exhausted { .. } => "pipeline_exhausted",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            PipelineEvent::Retrying { timestamp, .. }
            | PipelineEvent::Succeeded { timestamp, .. }
            | PipelineEvent::Exhausted { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            PipelineEvent::Retrying { name, .. }
            | PipelineEvent::Succeeded { name, .. }
            | PipelineEvent::Exhausted { name, .. } => name,
        }
    }
}
