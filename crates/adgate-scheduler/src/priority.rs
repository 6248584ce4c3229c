//! The priority formula, grounded on
//! `original_source/core/scheduler.py::PriorityScheduler.submit`'s
//! `base_priority // tier_weight` computation verbatim (including its
//! integer-division truncation, not rounding).

use adgate_core::Tier;

/// Computes the scheduler priority for an operation. Lower values are
/// dequeued first.
///
/// `urgency` is clamped to `[0, 99]` before use, matching the Python
/// original's `max(0, min(urgency, 99))`.
pub fn compute_priority(urgency: u8, tier: Tier) -> i64 {
    let urgency_clamped = urgency.min(99) as i64;
    let base = 100 - urgency_clamped;
    let weight = tier.weight() as i64;
    base / weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_weighting_produces_expected_priority_values() {
        assert_eq!(compute_priority(99, Tier::Gold), 0);
        assert_eq!(compute_priority(0, Tier::Bronze), 100);
        assert_eq!(compute_priority(99, Tier::Bronze), 1);
        assert_eq!(compute_priority(50, Tier::Gold), 16);
        assert_eq!(compute_priority(50, Tier::Silver), 25);
    }

    #[test]
    fn urgency_above_99_is_clamped() {
        assert_eq!(compute_priority(200, Tier::Gold), compute_priority(99, Tier::Gold));
    }

    #[test]
    fn higher_tier_never_yields_a_worse_priority_at_equal_urgency() {
        for urgency in [0u8, 25, 50, 75, 99] {
            let gold = compute_priority(urgency, Tier::Gold);
            let silver = compute_priority(urgency, Tier::Silver);
            let bronze = compute_priority(urgency, Tier::Bronze);
            assert!(gold <= silver);
            assert!(silver <= bronze);
        }
    }
}
