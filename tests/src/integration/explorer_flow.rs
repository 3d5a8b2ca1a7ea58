//! # Explorer Flow Tests
//!
//! Runs `AddressDiscoveryService` over the real `ExplorerActivityOracle`
//! against a mock explorer that answers `POST /addresses/used` from a fixed
//! set of used addresses.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use address_discovery::{
        AddressDiscoveryApi, AddressDiscoveryService, AddressHash, DiscoveryConfig,
        DiscoveryError, ExplorerActivityOracle, ExplorerConfig, Metrics, MockAddressDeriver,
    };
    use mockito::{Mock, Request, Server, ServerGuard};

    use crate::integration::init_test_logging;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const SEED: &str = "explorer-flow-seed";

    type ExplorerService = AddressDiscoveryService<MockAddressDeriver, ExplorerActivityOracle>;

    /// Answer every queried address with its membership in `active`.
    fn answer_from(active: HashSet<AddressHash>) -> impl Fn(&Request) -> Vec<u8> + Send + Sync {
        move |request| {
            let queried: Vec<AddressHash> =
                serde_json::from_slice(request.body().unwrap()).unwrap();
            let answer: Vec<bool> = queried.iter().map(|a| active.contains(a)).collect();
            serde_json::to_vec(&answer).unwrap()
        }
    }

    async fn explorer_mock(
        server: &mut ServerGuard,
        active: HashSet<AddressHash>,
        expected_requests: usize,
    ) -> Mock {
        server
            .mock("POST", "/addresses/used")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(answer_from(active))
            .expect(expected_requests)
            .create_async()
            .await
    }

    fn service(server: &ServerGuard, config: DiscoveryConfig) -> ExplorerService {
        let deriver = MockAddressDeriver::new(SEED, config.total_groups);
        let oracle =
            ExplorerActivityOracle::new(ExplorerConfig::for_testing(server.url())).unwrap();
        AddressDiscoveryService::new(config, deriver, oracle)
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    /// Seeds for four groups go out in one request; one group needs a single
    /// extension after activity in the middle of its seed.
    #[tokio::test]
    async fn test_discovery_over_http() {
        init_test_logging();
        let deriver = MockAddressDeriver::new(SEED, 4);

        // Group 1 seeds indexes 5..=9, so index 7 leaves a gap of 2.
        let used = deriver.hash_for(1, 7);
        let mut server = Server::new_async().await;
        let mock = explorer_mock(&mut server, HashSet::from([used.clone()]), 2).await;

        let service = service(&server, DiscoveryConfig::default());
        let report = service.discover_with_report(&[], 5).await.unwrap();

        assert_eq!(report.active_addresses.len(), 1);
        let found = &report.active_addresses[0];
        assert_eq!((found.group, found.index), (1, 7));
        assert_eq!(found.hash, used);

        assert_eq!(report.oracle_requests, 2);
        assert_eq!(report.consumed_indexes, (0..23).collect::<Vec<_>>());
        assert!(report.groups.iter().all(|g| g.gap >= 5));
        mock.assert_async().await;
    }

    /// 20 groups of 5 seeds exceed one page and are split 80 + 20.
    #[tokio::test]
    async fn test_seed_paged_over_http() {
        let mut server = Server::new_async().await;
        let mock = explorer_mock(&mut server, HashSet::new(), 2).await;

        let config = DiscoveryConfig {
            total_groups: 20,
            ..DiscoveryConfig::default()
        };
        let service = service(&server, config);
        let active = service.discover(&[], 5).await.unwrap();

        assert!(active.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_active_passthrough() {
        let mut server = Server::new_async().await;
        let used: AddressHash = "used-address".to_string();
        let mock = explorer_mock(&mut server, HashSet::from([used.clone()]), 1).await;

        let service = service(&server, DiscoveryConfig::default());
        let results = service
            .check_active(&["fresh".to_string(), used, "other".to_string()])
            .await
            .unwrap();

        assert_eq!(results, vec![false, true, false]);
        mock.assert_async().await;
    }

    /// A persistent explorer outage is retried, then aborts the whole scan.
    #[tokio::test]
    async fn test_explorer_outage_aborts_discovery() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/addresses/used")
            .with_status(502)
            .expect(2)
            .create_async()
            .await;

        let config = ExplorerConfig {
            max_retries: 1,
            ..ExplorerConfig::for_testing(server.url())
        };
        let metrics = Arc::new(Metrics::new());
        let service = AddressDiscoveryService::new(
            DiscoveryConfig::default(),
            MockAddressDeriver::new(SEED, 4),
            ExplorerActivityOracle::new(config).unwrap(),
        )
        .with_metrics(metrics.clone());

        let err = service.discover(&[], 5).await.unwrap_err();

        assert!(matches!(err, DiscoveryError::OracleRequestFailed(_)));
        assert_eq!(metrics.snapshot().discoveries_failed, 1);
        assert_eq!(metrics.snapshot().discoveries_completed, 0);
        mock.assert_async().await;
    }

    /// An explorer that drops results is rejected, never zipped short.
    #[tokio::test]
    async fn test_short_answer_aborts_discovery() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/addresses/used")
            .with_status(200)
            .with_body("[false, false]")
            .create_async()
            .await;

        let service = service(&server, DiscoveryConfig::default());
        let err = service.discover(&[], 5).await.unwrap_err();

        assert!(err.to_string().contains("misaligned"));
    }
}
