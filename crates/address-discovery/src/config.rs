//! # Discovery Configuration
//!
//! Configuration for the discovery service and the explorer oracle adapter.

use serde::{Deserialize, Serialize};
use std::env;

use crate::domain::{DiscoveryError, DEFAULT_MIN_GAP, QUERY_LIMIT, TOTAL_NUMBER_OF_GROUPS};

/// Discovery service configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Gap used by `AddressDiscoveryApi::discover_default`.
    pub min_gap: usize,

    /// Number of address groups to scan.
    pub total_groups: u32,

    /// Maximum addresses per oracle request.
    pub query_limit: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_gap: DEFAULT_MIN_GAP,
            total_groups: TOTAL_NUMBER_OF_GROUPS,
            query_limit: QUERY_LIMIT,
        }
    }
}

impl DiscoveryConfig {
    /// Create a config for testing (single group, small pages).
    pub fn for_testing() -> Self {
        Self {
            min_gap: DEFAULT_MIN_GAP,
            total_groups: 1,
            query_limit: 10,
        }
    }

    /// Reject configurations that cannot back `discover_default`.
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        self.validate_layout()?;
        if self.min_gap == 0 {
            return Err(DiscoveryError::InvalidMinGap(self.min_gap));
        }
        Ok(())
    }

    /// Reject group and paging settings the discovery loop cannot run with.
    ///
    /// Ignores `min_gap`; an explicit scan brings its own.
    pub fn validate_layout(&self) -> Result<(), DiscoveryError> {
        if self.total_groups == 0 {
            return Err(DiscoveryError::InvalidConfig(
                "total_groups must be at least 1".to_string(),
            ));
        }
        if self.query_limit == 0 {
            return Err(DiscoveryError::InvalidConfig(
                "query_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Explorer oracle configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Explorer base URL (e.g., "https://backend.mainnet.alephium.org").
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Client-side request rate towards the explorer.
    pub requests_per_second: u32,

    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,

    /// Initial retry delay, doubled on every further attempt.
    pub retry_backoff_ms: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://backend.mainnet.alephium.org".to_string(),
            timeout_ms: 10_000,
            requests_per_second: 5,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

impl ExplorerConfig {
    /// Create a config for testing against a local mock server.
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: 2_000,
            requests_per_second: 1_000,
            max_retries: 0,
            retry_backoff_ms: 1,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DISCOVERY_EXPLORER_URL`: Explorer base URL
    /// - `DISCOVERY_TIMEOUT_MS`: Request timeout (default: 10000)
    /// - `DISCOVERY_RPS`: Requests per second (default: 5)
    /// - `DISCOVERY_MAX_RETRIES`: Retries for transient failures (default: 2)
    /// - `DISCOVERY_RETRY_BACKOFF_MS`: Initial backoff (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("DISCOVERY_EXPLORER_URL").unwrap_or(defaults.base_url),

            timeout_ms: env::var("DISCOVERY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),

            requests_per_second: env::var("DISCOVERY_RPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.requests_per_second),

            max_retries: env::var("DISCOVERY_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),

            retry_backoff_ms: env::var("DISCOVERY_RETRY_BACKOFF_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_backoff_ms),
        }
    }
}
