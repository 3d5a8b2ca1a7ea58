//! # Adapters Module
//!
//! Implementations of the outbound ports against real services.

pub mod explorer;

pub use explorer::ExplorerActivityOracle;
