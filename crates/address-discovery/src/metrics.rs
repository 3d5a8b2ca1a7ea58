//! Metrics hooks for discovery runs
//!
//! Counters for derivation, oracle traffic and scan outcomes.
//!
//! ## Usage
//!
//! ```ignore
//! use address_discovery::Metrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let service = AddressDiscoveryService::new(config, deriver, oracle)
//!     .with_metrics(metrics.clone());
//!
//! service.discover(&[], 5).await?;
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for discovery runs
///
/// Thread-safe counters shared between the service and its callers.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Addresses produced by the deriver
    pub addresses_derived: AtomicU64,
    /// Addresses sent to the oracle
    pub addresses_checked: AtomicU64,
    /// Oracle requests issued (one per page)
    pub oracle_requests: AtomicU64,
    /// Active addresses found
    pub active_addresses_found: AtomicU64,
    /// Runs that returned a result
    pub discoveries_completed: AtomicU64,
    /// Runs aborted by an error
    pub discoveries_failed: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a batch of derived addresses
    pub fn record_derived(&self, count: usize) {
        self.addresses_derived
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record one oracle request
    pub fn record_oracle_request(&self, addresses: usize) {
        self.oracle_requests.fetch_add(1, Ordering::Relaxed);
        self.addresses_checked
            .fetch_add(addresses as u64, Ordering::Relaxed);
    }

    /// Record active addresses found
    pub fn record_active(&self, count: usize) {
        self.active_addresses_found
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record the outcome of a discovery run
    pub fn record_discovery(&self, success: bool) {
        if success {
            self.discoveries_completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.discoveries_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            addresses_derived: self.addresses_derived.load(Ordering::Relaxed),
            addresses_checked: self.addresses_checked.load(Ordering::Relaxed),
            oracle_requests: self.oracle_requests.load(Ordering::Relaxed),
            active_addresses_found: self.active_addresses_found.load(Ordering::Relaxed),
            discoveries_completed: self.discoveries_completed.load(Ordering::Relaxed),
            discoveries_failed: self.discoveries_failed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Metrics`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Addresses produced by the deriver
    pub addresses_derived: u64,
    /// Addresses sent to the oracle
    pub addresses_checked: u64,
    /// Oracle requests issued
    pub oracle_requests: u64,
    /// Active addresses found
    pub active_addresses_found: u64,
    /// Successful runs
    pub discoveries_completed: u64,
    /// Failed runs
    pub discoveries_failed: u64,
}
