use adgate_core::Tier;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Point-in-time snapshot of a [`crate::PriorityScheduler`]'s counters,
/// matching `original_source/core/scheduler.py::SchedulerStats.to_dict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerStats {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
    pub by_tier: HashMap<Tier, u64>,
    pub queue_size: usize,
    pub workers_alive: usize,
}

impl SchedulerStats {
    /// `submitted - completed - failed`, i.e. operations neither finished
    /// nor failed yet (queued or mid-flight in a worker).
    pub fn pending(&self) -> u64 {
        self.submitted
            .saturating_sub(self.completed)
            .saturating_sub(self.failed)
    }
}

#[derive(Default)]
pub(crate) struct SchedulerStatsInner {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    by_tier: Mutex<HashMap<Tier, u64>>,
}

impl SchedulerStatsInner {
    pub(crate) fn record_submitted(&self, tier: Tier) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        *self.by_tier.lock().unwrap().entry(tier).or_insert(0) += 1;
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, queue_size: usize, workers_alive: usize) -> SchedulerStats {
        SchedulerStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            by_tier: self.by_tier.lock().unwrap().clone(),
            queue_size,
            workers_alive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_submitted_minus_completed_and_failed() {
        let stats = SchedulerStats {
            submitted: 10,
            completed: 6,
            failed: 1,
            by_tier: HashMap::new(),
            queue_size: 0,
            workers_alive: 0,
        };
        assert_eq!(stats.pending(), 3);
    }

    #[test]
    fn by_tier_counts_accumulate_per_tier() {
        let inner = SchedulerStatsInner::default();
        inner.record_submitted(Tier::Gold);
        inner.record_submitted(Tier::Gold);
        inner.record_submitted(Tier::Bronze);

        let snapshot = inner.snapshot(0, 0);
        assert_eq!(snapshot.by_tier[&Tier::Gold], 2);
        assert_eq!(snapshot.by_tier[&Tier::Bronze], 1);
    }
}
