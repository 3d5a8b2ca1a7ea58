//! # Query Paging
//!
//! Splits an oracle query into consecutive chunks the oracle accepts.

use std::ops::Range;

/// Consecutive ranges covering `0..len`, each at most `limit` long.
///
/// Yields `ceil(len / limit)` non-empty ranges. A zero `limit` is treated as 1.
pub fn query_pages(len: usize, limit: usize) -> Vec<Range<usize>> {
    let limit = limit.max(1);
    (0..len)
        .step_by(limit)
        .map(|start| start..(start + limit).min(len))
        .collect()
}
