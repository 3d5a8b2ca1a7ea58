//! # Domain Entities
//!
//! Derived addresses and the per-run discovery report.

use serde::{Deserialize, Serialize};

use super::errors::{AddressHash, AddressIndex, Group};

/// An address produced by the external deriver.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    /// Derivation index.
    pub index: AddressIndex,
    /// Group the address belongs to.
    pub group: Group,
    /// Encoded address.
    pub hash: AddressHash,
}

impl DerivedAddress {
    /// Create a new derived address.
    pub fn new(index: AddressIndex, group: Group, hash: impl Into<AddressHash>) -> Self {
        Self {
            index,
            group,
            hash: hash.into(),
        }
    }
}

/// Outcome of scanning one group.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupScan {
    /// Scanned group.
    pub group: Group,
    /// Trailing run of unused addresses when the scan stopped.
    pub gap: usize,
    /// Addresses checked against the oracle for this group.
    pub checked: usize,
    /// Active addresses found in this group.
    pub active: usize,
    /// Highest index checked for this group.
    pub highest_checked_index: Option<AddressIndex>,
    /// Oracle batches issued for this group after seeding.
    pub extensions: usize,
}

impl GroupScan {
    /// Create an empty scan record.
    pub fn new(group: Group) -> Self {
        Self {
            group,
            gap: 0,
            checked: 0,
            active: 0,
            highest_checked_index: None,
            extensions: 0,
        }
    }

    /// Account for a batch of checked addresses.
    pub fn record_batch(&mut self, batch: &[DerivedAddress], active: usize, gap: usize) {
        self.checked += batch.len();
        self.active += active;
        self.gap = gap;
        if let Some(max) = batch.iter().map(|a| a.index).max() {
            self.highest_checked_index =
                Some(self.highest_checked_index.map_or(max, |h| h.max(max)));
        }
    }
}

/// Result of one discovery run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Active addresses, groups ascending, indexes ascending within a group.
    pub active_addresses: Vec<DerivedAddress>,
    /// One entry per scanned group.
    pub groups: Vec<GroupScan>,
    /// Oracle requests issued.
    pub oracle_requests: usize,
    /// Skip-set after the run (input skip indexes plus everything derived).
    pub consumed_indexes: Vec<AddressIndex>,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

impl DiscoveryReport {
    /// Total addresses checked across all groups.
    pub fn total_checked(&self) -> usize {
        self.groups.iter().map(|g| g.checked).sum()
    }

    /// Active addresses belonging to `group`.
    pub fn active_in_group(&self, group: Group) -> impl Iterator<Item = &DerivedAddress> {
        self.active_addresses
            .iter()
            .filter(move |a| a.group == group)
    }
}
