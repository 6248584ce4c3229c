//! The queued unit of work, grounded on
//! `original_source/core/scheduler.py::Operation` — a dataclass carrying a
//! derived `priority`, a monotonic tie-break timestamp, and an arbitrary
//! callable. Rust has no `*args, **kwargs`, so the callable here is a
//! type-erased, already-closed-over future rather than a function plus
//! argument tuple: callers build their own closure and hand it a boxed
//! future to run.

use adgate_core::Tier;
use futures::future::BoxFuture;
use std::cmp::Ordering;
use std::time::Instant;

/// A unit of work accepted by [`crate::PriorityScheduler::submit`].
///
/// The future is expected to report its own outcome to the caller (e.g. via
/// a `oneshot` channel it closes over) — the scheduler itself is opaque to
/// what the operation produces, only to when it runs and whether it
/// panicked.
pub struct QueuedOperation {
    pub(crate) tenant_id: String,
    pub(crate) tier: Tier,
    pub(crate) priority: i64,
    pub(crate) seq: u64,
    pub(crate) submitted_at: Instant,
    pub(crate) work: BoxFuture<'static, ()>,
}

impl QueuedOperation {
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }
}

// `BinaryHeap` is a max-heap; `Operation.__lt__` in the Python original
// orders the *lowest* priority value (and, on a tie, the earliest
// timestamp) first, so `Ord` here is deliberately reversed from the natural
// numeric order to make that minimum the heap's max.
impl Ord for QueuedOperation {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedOperation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedOperation {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for QueuedOperation {}
