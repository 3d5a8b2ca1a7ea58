//! # Address Discovery
//!
//! Gap-limit discovery of active wallet addresses across address groups.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Restore the set of addresses a wallet has actually used without scanning
//! the whole index space. Every group is seeded with `min_gap` fresh addresses,
//! all seeds are checked in one batched oracle round-trip, and each group is
//! then extended until it ends in a run of `min_gap` consecutive unused
//! addresses.
//!
//! | Guarantee | Description |
//! |-----------|-------------|
//! | Gap termination | A group stops only once `gap >= min_gap` |
//! | Index non-collision | One shared skip-set; no index is derived twice |
//! | Deterministic call order | Groups ascending, batches in derivation order |
//! | All-or-nothing | Any oracle or derivation failure aborts the scan |
//!
//! ## Module Structure
//!
//! ```text
//! address-discovery/
//! ├── domain/          # DerivedAddress, IndexAllocator, reports, errors
//! ├── algorithms/      # Gap scan, result splitting, query paging
//! ├── ports/           # API trait (inbound) + deriver/oracle traits (outbound)
//! ├── application/     # AddressDiscoveryService, BatchedActivityChecker
//! ├── adapters/        # Explorer HTTP oracle
//! ├── config.rs        # DiscoveryConfig, ExplorerConfig
//! └── metrics.rs       # Atomic counters
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use address_discovery::{
//!     AddressDiscoveryApi, AddressDiscoveryService, DiscoveryConfig,
//!     ExplorerActivityOracle, ExplorerConfig,
//! };
//!
//! let oracle = ExplorerActivityOracle::new(ExplorerConfig::from_env())?;
//! let service = AddressDiscoveryService::new(DiscoveryConfig::default(), deriver, oracle);
//!
//! let active = service.discover(&known_indexes, 5).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;

// Re-exports
pub use adapters::ExplorerActivityOracle;
pub use algorithms::{query_pages, scan_gap, split_results_per_group, GapScan};
pub use application::{AddressDiscoveryService, BatchedActivityChecker};
pub use config::{DiscoveryConfig, ExplorerConfig};
pub use domain::{
    invariant_aligned_results, invariant_min_gap, invariant_valid_group, AddressHash,
    AddressIndex, DerivedAddress, DiscoveryError, DiscoveryReport, Group, GroupScan,
    IndexAllocator, DEFAULT_MIN_GAP, QUERY_LIMIT, TOTAL_NUMBER_OF_GROUPS,
};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::{
    ActivityOracle, AddressDeriver, AddressDiscoveryApi, MockActivityOracle, MockAddressDeriver,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
