//! Property-based tests covering fingerprint canonicalization (independent
//! of the cache's own unit tests, which only check a couple of fixed
//! examples) and the priority formula's monotonicity and bounds.

use adgate_cache::fingerprint;
use adgate_core::Tier;
use adgate_scheduler::compute_priority;
use proptest::prelude::*;

fn tier_strategy() -> impl Strategy<Value = Tier> {
    prop_oneof![Just(Tier::Gold), Just(Tier::Silver), Just(Tier::Bronze)]
}

proptest! {
    /// Invariant: fingerprint is independent of the order params were
    /// supplied in, since the cache key sorts them.
    #[test]
    fn fingerprint_is_independent_of_param_order(
        tenant in "[a-z]{1,8}",
        op in "[a-z]{1,8}",
        mut pairs in prop::collection::vec(("[a-z]{1,4}", "[a-z0-9]{1,4}"), 0..6),
    ) {
        let original: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let a = fingerprint(&tenant, &op, &original);

        pairs.reverse();
        let shuffled: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let b = fingerprint(&tenant, &op, &shuffled);

        prop_assert_eq!(a, b);
    }

    /// Invariant 6 (tier-monotone preference): at equal urgency, a
    /// higher-weighted tier never yields a numerically larger (i.e. worse)
    /// priority than a lower-weighted one.
    #[test]
    fn priority_is_monotone_in_tier_weight(urgency in 0u8..=255) {
        let gold = compute_priority(urgency, Tier::Gold);
        let silver = compute_priority(urgency, Tier::Silver);
        let bronze = compute_priority(urgency, Tier::Bronze);

        prop_assert!(gold <= silver);
        prop_assert!(silver <= bronze);
    }

    /// Invariant: priority is never negative and never exceeds the
    /// clamped-urgency-0/bronze ceiling of 100.
    #[test]
    fn priority_stays_within_bounds(urgency in 0u8..=255, tier in tier_strategy()) {
        let priority = compute_priority(urgency, tier);
        prop_assert!((0..=100).contains(&priority));
    }
}
