//! # Scan Properties
//!
//! Checks the discovery loop against a sequential reference scan and the
//! structural guarantees every run must keep:
//!
//! 1. **Termination**: every group ends with `gap >= min_gap`
//! 2. **Non-collision**: no index is derived twice or taken from the skip-set
//! 3. **Completeness**: every address reachable within the gap is reported
//! 4. **Idempotence**: same inputs, same oracle traffic, same result
//! 5. **Group independence**: later groups never change earlier results
//! 6. **Call ordering**: seeds first, then extensions by ascending group

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::sync::Arc;

    use address_discovery::{
        AddressDiscoveryApi, AddressDiscoveryService, AddressHash, AddressIndex, DiscoveryConfig,
        DiscoveryReport, Group, Metrics, MockActivityOracle, MockAddressDeriver,
    };
    use proptest::prelude::*;

    use crate::integration::init_test_logging;

    // =============================================================================
    // HELPERS
    // =============================================================================

    const SEED: &str = "property-seed";

    fn config(total_groups: Group) -> DiscoveryConfig {
        DiscoveryConfig {
            total_groups,
            ..DiscoveryConfig::default()
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    /// Run one discovery and keep the oracle for traffic inspection.
    async fn scan(
        total_groups: Group,
        active: &BTreeSet<(Group, AddressIndex)>,
        skip: &[AddressIndex],
        min_gap: usize,
    ) -> (DiscoveryReport, Arc<MockActivityOracle>) {
        let deriver = Arc::new(MockAddressDeriver::new(SEED, total_groups));
        let oracle = Arc::new(MockActivityOracle::with_active(
            active.iter().map(|&(g, i)| deriver.hash_for(g, i)),
        ));
        let service =
            AddressDiscoveryService::from_shared(config(total_groups), deriver, oracle.clone());
        let report = service.discover_with_report(skip, min_gap).await.unwrap();
        (report, oracle)
    }

    /// Reference scan for a single group without skips: walk indexes one by
    /// one until `min_gap` consecutive unused ones follow the last used one.
    fn sequential_scan(
        active: &BTreeSet<AddressIndex>,
        min_gap: usize,
    ) -> (Vec<AddressIndex>, u32) {
        let mut found = Vec::new();
        let mut trailing = 0;
        let mut index = 0;
        while trailing < min_gap {
            if active.contains(&index) {
                found.push(index);
                trailing = 0;
            } else {
                trailing += 1;
            }
            index += 1;
        }
        (found, index)
    }

    /// Reverse lookup from address hash to (group, index).
    fn hash_index(
        total_groups: Group,
        up_to: AddressIndex,
    ) -> HashMap<AddressHash, (Group, AddressIndex)> {
        let deriver = MockAddressDeriver::new(SEED, total_groups);
        (0..total_groups)
            .flat_map(|g| (0..up_to).map(move |i| (g, i)))
            .map(|(g, i)| (deriver.hash_for(g, i), (g, i)))
            .collect()
    }

    fn activity_strategy() -> impl Strategy<Value = (Group, BTreeSet<(Group, AddressIndex)>)> {
        (1u32..=4).prop_flat_map(|groups| {
            (
                Just(groups),
                prop::collection::btree_set((0..groups, 0u32..60), 0..10),
            )
        })
    }

    // =============================================================================
    // PROPERTIES
    // =============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_single_group_matches_sequential_scan(
            active in prop::collection::btree_set(0u32..40, 0..12),
            min_gap in 1usize..6,
        ) {
            let pairs: BTreeSet<_> = active.iter().map(|&i| (0, i)).collect();
            let (report, _) = block_on(scan(1, &pairs, &[], min_gap));
            let (expected, scanned) = sequential_scan(&active, min_gap);

            let found: Vec<_> = report.active_addresses.iter().map(|a| a.index).collect();
            prop_assert_eq!(found, expected);
            prop_assert_eq!(report.consumed_indexes, (0..scanned).collect::<Vec<_>>());
            prop_assert!(report.groups[0].gap >= min_gap);
        }

        #[test]
        fn prop_structural_guarantees(
            (groups, active) in activity_strategy(),
            skip in prop::collection::btree_set(0u32..30, 0..8),
            min_gap in 1usize..5,
        ) {
            let skip: Vec<_> = skip.into_iter().collect();
            let (report, oracle) = block_on(scan(groups, &active, &skip, min_gap));
            let deriver = MockAddressDeriver::new(SEED, groups);

            // Termination
            prop_assert_eq!(report.groups.len(), groups as usize);
            prop_assert!(report.groups.iter().all(|g| g.gap >= min_gap));

            // Non-collision
            let consumed: HashSet<_> = report.consumed_indexes.iter().collect();
            prop_assert_eq!(consumed.len(), report.consumed_indexes.len());
            prop_assert!(skip.iter().all(|i| !consumed.contains(i)));
            let queried = oracle.queried();
            let unique: HashSet<_> = queried.iter().collect();
            prop_assert_eq!(unique.len(), queried.len());
            prop_assert_eq!(queried.len(), report.consumed_indexes.len());

            // Soundness and ordering of the result
            for address in &report.active_addresses {
                prop_assert!(active.contains(&(address.group, address.index)));
                prop_assert_eq!(&address.hash, &deriver.hash_for(address.group, address.index));
            }
            let keys: Vec<_> = report.active_addresses.iter().map(|a| (a.group, a.index)).collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            prop_assert_eq!(keys, sorted);
        }
    }

    // =============================================================================
    // EXAMPLES
    // =============================================================================

    #[tokio::test]
    async fn test_idempotent_runs() {
        init_test_logging();
        let active = BTreeSet::from([(0, 2), (1, 9), (1, 12), (3, 17)]);

        let (first, first_oracle) = scan(4, &active, &[4], 5).await;
        let (second, second_oracle) = scan(4, &active, &[4], 5).await;

        assert_eq!(first.active_addresses, second.active_addresses);
        assert_eq!(first.consumed_indexes, second.consumed_indexes);
        assert_eq!(first_oracle.calls(), second_oracle.calls());
    }

    #[tokio::test]
    async fn test_later_groups_do_not_change_earlier_results() {
        // Group 0 seeds 0..=4; index 3 forces an extension.
        let base = BTreeSet::from([(0, 3)]);
        let (alone, _) = scan(4, &base, &[], 5).await;

        let mut busy = base.clone();
        busy.extend([(2, 11), (3, 19)]);
        let (with_others, _) = scan(4, &busy, &[], 5).await;

        let group_zero = |r: &DiscoveryReport| r.active_in_group(0).cloned().collect::<Vec<_>>();
        assert_eq!(group_zero(&alone), group_zero(&with_others));
        assert_eq!(alone.groups[0], with_others.groups[0]);
        assert!(with_others.active_in_group(3).count() == 1);
    }

    #[tokio::test]
    async fn test_seeds_first_then_extensions_by_group() {
        let active = BTreeSet::from([(0, 4), (2, 13), (3, 16)]);
        let (_, oracle) = scan(4, &active, &[], 5).await;
        let lookup = hash_index(4, 100);

        let calls = oracle.calls();
        let seed_groups: Vec<Group> = calls[0].iter().map(|h| lookup[h].0).collect();
        assert_eq!(seed_groups.len(), 20);
        assert!(seed_groups.windows(2).all(|w| w[0] <= w[1]));

        let extension_groups: Vec<Group> = calls[1..]
            .iter()
            .map(|call| {
                let group = lookup[&call[0]].0;
                assert!(call.iter().all(|h| lookup[h].0 == group));
                group
            })
            .collect();
        assert_eq!(extension_groups, vec![0, 2, 3]);
    }

    #[tokio::test]
    async fn test_failure_mid_scan_returns_nothing() {
        let deriver = MockAddressDeriver::new(SEED, 4);
        let metrics = Arc::new(Metrics::new());
        let oracle = MockActivityOracle::with_active([deriver.hash_for(1, 9)]).fail_after(1);
        let service = AddressDiscoveryService::new(config(4), deriver, oracle)
            .with_metrics(metrics.clone());

        let result = service.discover(&[], 5).await;

        assert!(result.is_err());
        assert_eq!(metrics.snapshot().discoveries_failed, 1);
        assert_eq!(metrics.snapshot().active_addresses_found, 0);
    }

    #[tokio::test]
    async fn test_metrics_match_report() {
        let active = BTreeSet::from([(0, 1), (1, 8)]);
        let deriver = MockAddressDeriver::new(SEED, 2);
        let oracle =
            MockActivityOracle::with_active(active.iter().map(|&(g, i)| deriver.hash_for(g, i)));
        let metrics = Arc::new(Metrics::new());
        let service =
            AddressDiscoveryService::new(config(2), deriver, oracle).with_metrics(metrics.clone());

        let report = service.discover_with_report(&[], 5).await.unwrap();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.addresses_derived as usize, report.consumed_indexes.len());
        assert_eq!(snapshot.addresses_checked as usize, report.total_checked());
        assert_eq!(snapshot.oracle_requests as usize, report.oracle_requests);
        assert_eq!(snapshot.active_addresses_found, 2);
    }
}
