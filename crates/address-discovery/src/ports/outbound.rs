//! # Outbound Ports
//!
//! Traits for the external collaborators (key derivation, activity oracle).

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::domain::{
    invariant_valid_group, AddressHash, AddressIndex, DerivedAddress, DiscoveryError, Group,
    QUERY_LIMIT, TOTAL_NUMBER_OF_GROUPS,
};

/// Deterministic address derivation - outbound port.
///
/// Implementations are pure: the same `(group, index)` always yields the same
/// address, and distinct pairs never collide.
pub trait AddressDeriver: Send + Sync {
    /// Derive the address at `index` for `group`.
    fn derive(&self, group: Group, index: AddressIndex) -> Result<DerivedAddress, DiscoveryError>;
}

/// Address activity oracle - outbound port.
///
/// Backed by an explorer/indexer; one request per call.
#[async_trait]
pub trait ActivityOracle: Send + Sync {
    /// Whether each address has on-chain history, aligned with the input.
    ///
    /// Callers send at most [`QUERY_LIMIT`] addresses per call.
    async fn addresses_used(&self, addresses: &[AddressHash]) -> Result<Vec<bool>, DiscoveryError>;

    /// Oracle identifier (for logging/debugging).
    fn oracle_id(&self) -> &str;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock deriver: hex-encoded SHA-256 over seed, group and index.
#[derive(Clone, Debug)]
pub struct MockAddressDeriver {
    /// Wallet seed stand-in.
    pub seed: Vec<u8>,
    /// Groups this deriver accepts.
    pub total_groups: Group,
}

impl Default for MockAddressDeriver {
    fn default() -> Self {
        Self {
            seed: b"mock-wallet-seed".to_vec(),
            total_groups: TOTAL_NUMBER_OF_GROUPS,
        }
    }
}

impl MockAddressDeriver {
    /// Create a deriver for a given seed.
    pub fn new(seed: impl Into<Vec<u8>>, total_groups: Group) -> Self {
        Self {
            seed: seed.into(),
            total_groups,
        }
    }

    /// The hash `derive` produces, without group validation.
    pub fn hash_for(&self, group: Group, index: AddressIndex) -> AddressHash {
        let mut hasher = Sha256::new();
        hasher.update(&self.seed);
        hasher.update(group.to_be_bytes());
        hasher.update(index.to_be_bytes());
        hex::encode(hasher.finalize())
    }
}

impl AddressDeriver for MockAddressDeriver {
    fn derive(&self, group: Group, index: AddressIndex) -> Result<DerivedAddress, DiscoveryError> {
        invariant_valid_group(group, self.total_groups).map_err(|e| {
            DiscoveryError::DerivationFailed {
                group,
                index,
                reason: e.to_string(),
            }
        })?;

        Ok(DerivedAddress::new(index, group, self.hash_for(group, index)))
    }
}

/// Mutable state behind the mock oracle.
#[derive(Debug, Default)]
struct MockOracleState {
    /// Requests received, in order.
    calls: Vec<Vec<AddressHash>>,
    /// Addresses still to be reported active regardless of `active`.
    active_budget: Option<usize>,
}

/// Mock activity oracle.
#[derive(Debug)]
pub struct MockActivityOracle {
    /// Oracle identifier.
    pub id: String,
    /// Addresses reported as used.
    pub active: HashSet<AddressHash>,
    /// Largest request accepted.
    pub max_batch: usize,
    /// Fail every request once this many have been served.
    pub fail_after: Option<usize>,
    /// Drop the last result of every answer.
    pub truncate_answers: bool,
    state: Mutex<MockOracleState>,
}

impl Default for MockActivityOracle {
    fn default() -> Self {
        Self {
            id: "mock-oracle".to_string(),
            active: HashSet::new(),
            max_batch: QUERY_LIMIT,
            fail_after: None,
            truncate_answers: false,
            state: Mutex::new(MockOracleState::default()),
        }
    }
}

impl MockActivityOracle {
    /// Oracle reporting exactly `active` as used.
    pub fn with_active(active: impl IntoIterator<Item = AddressHash>) -> Self {
        Self {
            active: active.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Oracle reporting the first `count` queried addresses as used, then
    /// falling back to the `active` set.
    pub fn with_active_budget(count: usize) -> Self {
        let oracle = Self::default();
        oracle.state.lock().active_budget = Some(count);
        oracle
    }

    /// Oracle that fails every request.
    pub fn failing() -> Self {
        Self::default().fail_after(0)
    }

    /// Fail every request once `served` requests have been answered.
    pub fn fail_after(mut self, served: usize) -> Self {
        self.fail_after = Some(served);
        self
    }

    /// Answer one result short of every request.
    pub fn truncating(mut self) -> Self {
        self.truncate_answers = true;
        self
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<Vec<AddressHash>> {
        self.state.lock().calls.clone()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Every queried address, in query order.
    pub fn queried(&self) -> Vec<AddressHash> {
        self.state.lock().calls.iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl ActivityOracle for MockActivityOracle {
    async fn addresses_used(&self, addresses: &[AddressHash]) -> Result<Vec<bool>, DiscoveryError> {
        let mut state = self.state.lock();

        if self.fail_after.is_some_and(|n| state.calls.len() >= n) {
            return Err(DiscoveryError::OracleRequestFailed(
                "Mock failure".to_string(),
            ));
        }
        if addresses.len() > self.max_batch {
            return Err(DiscoveryError::OracleRequestFailed(format!(
                "batch of {} exceeds limit {}",
                addresses.len(),
                self.max_batch
            )));
        }

        state.calls.push(addresses.to_vec());

        let mut results = Vec::with_capacity(addresses.len());
        for address in addresses {
            let from_budget = match state.active_budget.as_mut() {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            };
            results.push(from_budget || self.active.contains(address));
        }

        if self.truncate_answers {
            results.pop();
        }
        Ok(results)
    }

    fn oracle_id(&self) -> &str {
        &self.id
    }
}
