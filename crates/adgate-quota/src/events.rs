use adgate_core::{ResilienceEvent, Tier};
use std::time::Instant;

/// Events emitted by a [`crate::QuotaGovernor`] for observability.
#[derive(Debug, Clone)]
pub enum QuotaEvent {
    /// `can_run` returned `false`.
    AdmissionRejected {
        name: String,
        timestamp: Instant,
        tenant: String,
        tier: Tier,
        reason: AdmissionRejectedReason,
    },
    /// `can_run` returned `true`.
    AdmissionGranted {
        name: String,
        timestamp: Instant,
        tenant: String,
    },
    /// `charge` completed (successfully or not — `store_error` distinguishes).
    Charged {
        name: String,
        timestamp: Instant,
        tenant: String,
        units: i64,
        store_error: bool,
    },
    /// `refund` completed.
    Refunded {
        name: String,
        timestamp: Instant,
        tenant: String,
        units: i64,
        store_error: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionRejectedReason {
    ClientPaused,
    InsufficientBalance,
    GlobalBudgetExhausted,
    BronzeReserveThreshold,
}

impl ResilienceEvent for QuotaEvent {
    fn event_type(&self) -> &'static str {
        match self {
            QuotaEvent::AdmissionRejected { .. } => "admission_rejected",
            QuotaEvent::AdmissionGranted { .. } => "admission_granted",
            QuotaEvent::Charged { .. } => "charged",
            QuotaEvent::Refunded { .. } => "refunded",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            QuotaEvent::AdmissionRejected { timestamp, .. }
            | QuotaEvent::AdmissionGranted { timestamp, .. }
            | QuotaEvent::Charged { timestamp, .. }
            | QuotaEvent::Refunded { timestamp, .. } => *timestamp,
        }
    }

    fn component_name(&self) -> &str {
        match self {
            QuotaEvent::AdmissionRejected { name, .. }
            | QuotaEvent::AdmissionGranted { name, .. }
            | QuotaEvent::Charged { name, .. }
            | QuotaEvent::Refunded { name, .. } => name,
        }
    }
}
