//! # Ownership Registry
//!
//! Who holds which identifier. Ownership bookkeeping belongs to the token
//! ledger the controller sits in front of; the controller only needs a place
//! to report issuances. [`TokenLedger`] is that seam, and
//! [`OwnershipRegistry`] is the in-memory ledger used by the service and the
//! tests.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use mintgate_protocol::{Address, TokenId};

/// Receives freshly issued identifiers.
///
/// Called exactly once per successful issuing operation, after the
/// controller has committed its own counters.
pub trait TokenLedger {
    fn record_issuance(&mut self, to: Address, ids: Range<TokenId>);
}

/// In-memory ownership ledger.
#[derive(Debug, Clone, Default)]
pub struct OwnershipRegistry {
    owners: BTreeMap<TokenId, Address>,
    holdings: HashMap<Address, Vec<TokenId>>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holder of `id`, if it has been issued.
    pub fn owner_of(&self, id: TokenId) -> Option<Address> {
        self.owners.get(&id).copied()
    }

    /// Every identifier `owner` holds, in issuance order.
    pub fn tokens_of(&self, owner: &Address) -> &[TokenId] {
        self.holdings.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn balance_of(&self, owner: &Address) -> usize {
        self.tokens_of(owner).len()
    }

    /// Total identifiers recorded.
    pub fn total_supply(&self) -> usize {
        self.owners.len()
    }
}

impl TokenLedger for OwnershipRegistry {
    fn record_issuance(&mut self, to: Address, ids: Range<TokenId>) {
        let held = self.holdings.entry(to).or_default();
        for id in ids {
            self.owners.insert(id, to);
            held.push(id);
        }
    }
}
