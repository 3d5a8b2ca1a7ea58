//! # Domain Errors
//!
//! Error types for address discovery.

use thiserror::Error;

/// Address group (partition of the address space).
pub type Group = u32;

/// Derivation index of an address.
pub type AddressIndex = u32;

/// Encoded address as understood by the activity oracle.
pub type AddressHash = String;

/// Address discovery error types.
///
/// Every variant is fatal to the discovery call that produced it; no partial
/// result is ever returned.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A batched activity check failed (transport, non-2xx, bad payload).
    #[error("Oracle request failed: {0}")]
    OracleRequestFailed(String),

    /// The address deriver could not produce an address.
    #[error("Derivation failed for group {group} index {index}: {reason}")]
    DerivationFailed {
        /// Requested group
        group: Group,
        /// Requested index
        index: AddressIndex,
        /// Deriver-provided reason
        reason: String,
    },

    /// Group outside `0..total`.
    #[error("Invalid group {group}: must be below {total}")]
    InvalidGroup {
        /// Offending group
        group: Group,
        /// Number of groups
        total: Group,
    },

    /// Gap threshold below 1.
    #[error("Invalid minimum gap {0}: must be at least 1")]
    InvalidMinGap(usize),

    /// Configuration rejected before a scan started.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DiscoveryError {
    /// True for failures that come from the activity oracle.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(self, DiscoveryError::OracleRequestFailed(_))
    }
}
