//! # Algorithms Module
//!
//! Pure computations used by the discovery loop.
//!
//! - Trailing-gap scan over a checked batch
//! - Splitting the seeded oracle answer back into groups
//! - Paging a query into oracle-sized chunks

pub mod gap;
pub mod paging;

pub use gap::*;
pub use paging::*;
