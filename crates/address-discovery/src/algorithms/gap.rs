//! # Gap Scan
//!
//! Per-group gap computation over a checked batch of addresses.

use crate::domain::{invariant_aligned_results, DerivedAddress, DiscoveryError};

/// Result of scanning one checked batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GapScan {
    /// Run of unused addresses at the live edge of the scan.
    pub gap: usize,
    /// Active addresses of the batch, in batch order.
    pub active: Vec<DerivedAddress>,
}

/// Compute the trailing gap of a batch and collect its active addresses.
///
/// The batch is read from its end backwards. If no address is active the
/// batch extends the previous run, so the gap is `starting_gap + len`.
/// Otherwise the run restarts after the last active address and the gap is
/// the number of addresses that follow it.
pub fn scan_gap(
    addresses: &[DerivedAddress],
    results: &[bool],
    starting_gap: usize,
) -> Result<GapScan, DiscoveryError> {
    invariant_aligned_results(addresses.len(), results.len())?;

    let gap = match results.iter().rev().position(|&used| used) {
        Some(trailing_unused) => trailing_unused,
        None => starting_gap + results.len(),
    };

    let active = addresses
        .iter()
        .zip(results)
        .filter(|(_, used)| **used)
        .map(|(address, _)| address.clone())
        .collect();

    Ok(GapScan { gap, active })
}

/// Split the flat seeded answer into one slice per group.
///
/// Seeding derives exactly `batch_size` addresses per group, so the flat list
/// must hold `batch_size * groups` results.
pub fn split_results_per_group(
    results: &[bool],
    batch_size: usize,
    groups: usize,
) -> Result<Vec<&[bool]>, DiscoveryError> {
    invariant_aligned_results(batch_size * groups, results.len())?;

    if batch_size == 0 {
        return Ok(vec![&results[..0]; groups]);
    }

    Ok(results.chunks(batch_size).collect())
}
