//! # Domain Invariants
//!
//! Rules that must hold for every discovery run.

use super::errors::{DiscoveryError, Group};

/// Number of address groups on the network.
pub const TOTAL_NUMBER_OF_GROUPS: Group = 4;

/// Default run of unused addresses that closes a group.
pub const DEFAULT_MIN_GAP: usize = 5;

/// Maximum addresses the explorer accepts per `/addresses/used` request.
pub const QUERY_LIMIT: usize = 80;

/// Invariant: groups are in `0..total`.
pub fn invariant_valid_group(group: Group, total: Group) -> Result<(), DiscoveryError> {
    if group >= total {
        return Err(DiscoveryError::InvalidGroup { group, total });
    }
    Ok(())
}

/// Invariant: a scan needs a gap of at least one address to terminate.
pub fn invariant_min_gap(min_gap: usize) -> Result<(), DiscoveryError> {
    if min_gap == 0 {
        return Err(DiscoveryError::InvalidMinGap(min_gap));
    }
    Ok(())
}

/// Invariant: the oracle answers exactly one boolean per queried address.
pub fn invariant_aligned_results(requested: usize, received: usize) -> Result<(), DiscoveryError> {
    if requested != received {
        return Err(DiscoveryError::OracleRequestFailed(format!(
            "misaligned response: {} addresses queried, {} results returned",
            requested, received
        )));
    }
    Ok(())
}
