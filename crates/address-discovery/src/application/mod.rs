//! # Application Module
//!
//! Application services orchestrating the domain.

pub mod activity_checker;
pub mod service;

pub use activity_checker::BatchedActivityChecker;
pub use service::AddressDiscoveryService;
