//! # Domain Value Objects
//!
//! Index allocation shared by every group of a discovery run.

use std::collections::BTreeSet;

use super::errors::AddressIndex;

/// Shared skip-set and index cursor.
///
/// Indexes come from a single pool that all groups draw from: an index handed
/// out while seeding group 0 is never handed out again for group 1. The
/// allocator is owned by one discovery run and passed by `&mut` through both
/// phases.
#[derive(Clone, Debug, Default)]
pub struct IndexAllocator {
    /// Indexes already known or handed out.
    skip: BTreeSet<AddressIndex>,
    /// Lowest index that may still be free.
    cursor: AddressIndex,
    /// Indexes handed out by this allocator (excludes the initial skip-set).
    allocated: usize,
}

impl IndexAllocator {
    /// Create an allocator that never yields any of `skip_indexes`.
    pub fn new(skip_indexes: impl IntoIterator<Item = AddressIndex>) -> Self {
        Self {
            skip: skip_indexes.into_iter().collect(),
            cursor: 0,
            allocated: 0,
        }
    }

    /// Hand out the lowest index not yet in the skip-set.
    ///
    /// Returns `None` once the index space is exhausted.
    pub fn allocate(&mut self) -> Option<AddressIndex> {
        while self.skip.contains(&self.cursor) {
            self.cursor = self.cursor.checked_add(1)?;
        }
        let index = self.cursor;
        self.skip.insert(index);
        self.allocated += 1;
        // Saturates on u32::MAX, which is now in the skip-set.
        self.cursor = self.cursor.saturating_add(1);
        Some(index)
    }

    /// Hand out `count` indexes in ascending order.
    pub fn allocate_many(&mut self, count: usize) -> Option<Vec<AddressIndex>> {
        (0..count).map(|_| self.allocate()).collect()
    }

    /// Number of indexes handed out by this allocator.
    pub fn allocated_count(&self) -> usize {
        self.allocated
    }

    /// The full skip-set, ascending.
    pub fn consumed(&self) -> Vec<AddressIndex> {
        self.skip.iter().copied().collect()
    }
}
