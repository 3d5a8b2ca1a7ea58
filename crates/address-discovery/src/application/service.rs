//! # Address Discovery Service
//!
//! Application service running the two-phase gap-limit scan.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

use super::activity_checker::BatchedActivityChecker;
use crate::algorithms::{scan_gap, split_results_per_group};
use crate::config::DiscoveryConfig;
use crate::domain::{
    invariant_min_gap, AddressHash, AddressIndex, DerivedAddress, DiscoveryError,
    DiscoveryReport, Group, GroupScan, IndexAllocator,
};
use crate::metrics::Metrics;
use crate::ports::{ActivityOracle, AddressDeriver, AddressDiscoveryApi};

/// Address Discovery Service - orchestrates derivation and activity checks.
pub struct AddressDiscoveryService<D: AddressDeriver, O: ActivityOracle> {
    /// Configuration.
    config: DiscoveryConfig,
    /// Address derivation collaborator.
    deriver: Arc<D>,
    /// Paged oracle client.
    checker: BatchedActivityChecker<O>,
    /// Shared counters.
    metrics: Arc<Metrics>,
}

impl<D: AddressDeriver, O: ActivityOracle> AddressDiscoveryService<D, O> {
    /// Create a new discovery service.
    pub fn new(config: DiscoveryConfig, deriver: D, oracle: O) -> Self {
        Self::from_shared(config, Arc::new(deriver), Arc::new(oracle))
    }

    /// Create a service over collaborators shared with other components.
    pub fn from_shared(config: DiscoveryConfig, deriver: Arc<D>, oracle: Arc<O>) -> Self {
        let metrics = Arc::new(Metrics::new());
        let checker =
            BatchedActivityChecker::new(oracle, config.query_limit).with_metrics(metrics.clone());
        Self {
            config,
            deriver,
            checker,
            metrics,
        }
    }

    /// Record into an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.checker = self.checker.with_metrics(metrics.clone());
        self.metrics = metrics;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Shared counters.
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Underlying oracle.
    pub fn oracle(&self) -> &Arc<O> {
        self.checker.oracle()
    }

    /// Internal: derive `count` fresh addresses for `group`.
    fn derive_batch(
        &self,
        group: Group,
        count: usize,
        allocator: &mut IndexAllocator,
    ) -> Result<Vec<DerivedAddress>, DiscoveryError> {
        let indexes = allocator
            .allocate_many(count)
            .ok_or_else(|| DiscoveryError::DerivationFailed {
                group,
                index: AddressIndex::MAX,
                reason: "address index space exhausted".to_string(),
            })?;

        let batch = indexes
            .into_iter()
            .map(|index| self.deriver.derive(group, index))
            .collect::<Result<Vec<_>, _>>()?;

        self.metrics.record_derived(batch.len());
        Ok(batch)
    }

    /// Internal: check a batch, returning its results and the requests spent.
    async fn check_batch(
        &self,
        batch: &[DerivedAddress],
    ) -> Result<(Vec<bool>, usize), DiscoveryError> {
        let hashes: Vec<AddressHash> = batch.iter().map(|a| a.hash.clone()).collect();
        let results = self.checker.check_active(&hashes).await?;
        Ok((results, self.checker.requests_for(hashes.len())))
    }

    /// Internal: both phases of one run.
    async fn run(
        &self,
        skip_indexes: &[AddressIndex],
        min_gap: usize,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        invariant_min_gap(min_gap)?;
        self.config.validate_layout()?;

        let start = Instant::now();
        let total_groups = self.config.total_groups;
        let mut allocator = IndexAllocator::new(skip_indexes.iter().copied());
        let mut oracle_requests = 0;

        // Phase 1: seed every group, then check all seeds together
        let mut seeded = Vec::with_capacity(total_groups as usize);
        for group in 0..total_groups {
            seeded.push(self.derive_batch(group, min_gap, &mut allocator)?);
        }

        let flat: Vec<DerivedAddress> = seeded.iter().flatten().cloned().collect();
        let (results, requests) = self.check_batch(&flat).await?;
        oracle_requests += requests;
        let per_group = split_results_per_group(&results, min_gap, total_groups as usize)?;

        debug!(
            "[discovery] Seeded {} groups with {} addresses in {} requests",
            total_groups,
            flat.len(),
            requests
        );

        // Phase 2: extend each group until its scan ends in a full gap
        let mut active_addresses = Vec::new();
        let mut groups = Vec::with_capacity(total_groups as usize);

        for ((group, batch), results) in (0..total_groups).zip(&seeded).zip(per_group) {
            let mut scan = GroupScan::new(group);

            let seed = scan_gap(batch, results, 0)?;
            scan.record_batch(batch, seed.active.len(), seed.gap);
            active_addresses.extend(seed.active);
            let mut gap = seed.gap;

            while gap < min_gap {
                let batch = self.derive_batch(group, min_gap - gap, &mut allocator)?;
                let (results, requests) = self.check_batch(&batch).await?;
                oracle_requests += requests;

                let extension = scan_gap(&batch, &results, gap)?;
                scan.record_batch(&batch, extension.active.len(), extension.gap);
                scan.extensions += 1;
                active_addresses.extend(extension.active);
                gap = extension.gap;

                debug!(
                    "[discovery] Group {} extended by {} addresses, gap now {}",
                    group,
                    batch.len(),
                    gap
                );
            }

            groups.push(scan);
        }

        Ok(DiscoveryReport {
            active_addresses,
            groups,
            oracle_requests,
            consumed_indexes: allocator.consumed(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl<D, O> AddressDiscoveryApi for AddressDiscoveryService<D, O>
where
    D: AddressDeriver + 'static,
    O: ActivityOracle + 'static,
{
    async fn discover(
        &self,
        skip_indexes: &[AddressIndex],
        min_gap: usize,
    ) -> Result<Vec<DerivedAddress>, DiscoveryError> {
        self.discover_with_report(skip_indexes, min_gap)
            .await
            .map(|report| report.active_addresses)
    }

    async fn discover_with_report(
        &self,
        skip_indexes: &[AddressIndex],
        min_gap: usize,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let span = info_span!(
            "discovery",
            min_gap,
            groups = self.config.total_groups,
            skipped = skip_indexes.len()
        );

        match self.run(skip_indexes, min_gap).instrument(span).await {
            Ok(report) => {
                self.metrics.record_discovery(true);
                self.metrics.record_active(report.active_addresses.len());
                info!(
                    "[discovery] Found {} active addresses ({} checked, {} requests, {}ms)",
                    report.active_addresses.len(),
                    report.total_checked(),
                    report.oracle_requests,
                    report.duration_ms
                );
                Ok(report)
            }
            Err(e) => {
                self.metrics.record_discovery(false);
                warn!("[discovery] Discovery aborted: {}", e);
                Err(e)
            }
        }
    }

    async fn discover_default(&self) -> Result<Vec<DerivedAddress>, DiscoveryError> {
        self.discover(&[], self.config.min_gap).await
    }

    async fn check_active(&self, addresses: &[AddressHash]) -> Result<Vec<bool>, DiscoveryError> {
        self.checker.check_active(addresses).await
    }
}
