//! # Batched Activity Checker
//!
//! Pages arbitrarily long activity queries into oracle-sized requests.

use std::sync::Arc;
use tracing::debug;

use crate::algorithms::query_pages;
use crate::domain::{invariant_aligned_results, AddressHash, DiscoveryError};
use crate::metrics::Metrics;
use crate::ports::ActivityOracle;

/// Client wrapper enforcing the oracle's per-request limit.
///
/// Pages are sent one after the other, never concurrently, and the answers
/// are concatenated in page order. Any failing page fails the whole call.
pub struct BatchedActivityChecker<O: ActivityOracle> {
    /// Underlying oracle.
    oracle: Arc<O>,
    /// Maximum addresses per request.
    query_limit: usize,
    /// Shared counters.
    metrics: Arc<Metrics>,
}

impl<O: ActivityOracle> BatchedActivityChecker<O> {
    /// Create a checker over `oracle`.
    pub fn new(oracle: Arc<O>, query_limit: usize) -> Self {
        Self {
            oracle,
            query_limit: query_limit.max(1),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Record into an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Maximum addresses per request.
    pub fn query_limit(&self) -> usize {
        self.query_limit
    }

    /// Underlying oracle.
    pub fn oracle(&self) -> &Arc<O> {
        &self.oracle
    }

    /// Number of requests `check_active` issues for `len` addresses.
    pub fn requests_for(&self, len: usize) -> usize {
        len.div_ceil(self.query_limit)
    }

    /// Check every address; one result per address, in input order.
    pub async fn check_active(
        &self,
        addresses: &[AddressHash],
    ) -> Result<Vec<bool>, DiscoveryError> {
        let mut results = Vec::with_capacity(addresses.len());

        for page in query_pages(addresses.len(), self.query_limit) {
            let chunk = &addresses[page.clone()];
            debug!(
                "[discovery] Querying {} for addresses {}..{}",
                self.oracle.oracle_id(),
                page.start,
                page.end
            );

            self.metrics.record_oracle_request(chunk.len());
            let answer = self.oracle.addresses_used(chunk).await?;
            invariant_aligned_results(chunk.len(), answer.len())?;

            results.extend(answer);
        }

        Ok(results)
    }
}
