//! # Inbound Ports
//!
//! API trait defining what the discovery subsystem offers its callers.

use async_trait::async_trait;

use crate::domain::{AddressHash, AddressIndex, DerivedAddress, DiscoveryError, DiscoveryReport};

/// Address Discovery API - inbound port.
#[async_trait]
pub trait AddressDiscoveryApi: Send + Sync {
    /// Discover every active address across all groups.
    ///
    /// `skip_indexes` are never derived nor queried. Each group stops once
    /// its scan ends in `min_gap` consecutive unused addresses.
    async fn discover(
        &self,
        skip_indexes: &[AddressIndex],
        min_gap: usize,
    ) -> Result<Vec<DerivedAddress>, DiscoveryError>;

    /// Same as [`discover`](Self::discover) with per-group statistics and the
    /// final skip-set, for callers that persist scan state.
    async fn discover_with_report(
        &self,
        skip_indexes: &[AddressIndex],
        min_gap: usize,
    ) -> Result<DiscoveryReport, DiscoveryError>;

    /// Discover with an empty skip-set and the configured gap.
    async fn discover_default(&self) -> Result<Vec<DerivedAddress>, DiscoveryError>;

    /// Check any number of addresses; one result per address, input order.
    async fn check_active(&self, addresses: &[AddressHash]) -> Result<Vec<bool>, DiscoveryError>;
}
