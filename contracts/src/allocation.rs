//! # Allocation Ledger
//!
//! The single piece of mutable state behind a sale: how many identifiers
//! exist, what is left in each pool, who has minted how many, what things
//! cost, and which gates are open.
//!
//! The ledger answers *"may this happen?"* through `check_*` guards and
//! applies *"it happened"* through crate-private `commit_*` methods. Only
//! the [`MintController`](crate::controller::MintController) calls the
//! latter, and only after every guard for the request has passed, so a
//! rejected request never leaves a partial write behind.
//!
//! ## Invariants
//!
//! - `issued_count <= supply_ceiling`, always.
//! - `reserved_pool` only shrinks, and only through give-aways.
//! - `presale_pool` shrinks by exactly `n` per whitelist mint and grows
//!   only through `set_presale_params`.

use serde::Serialize;
use std::collections::HashMap;
use std::ops::Range;

use mintgate_protocol::config::DeploymentConfig;
use mintgate_protocol::crypto::HashAlgorithm;
use mintgate_protocol::merkle::{self, Proof};
use mintgate_protocol::types::hex32;
use mintgate_protocol::{Address, Hash32, TokenId, Wei};

use crate::error::MintError;

/// Which minting path is currently open. Derived from the two gates, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing mints except give-aways.
    Paused,
    /// Whitelist path open, public path closed.
    Presale,
    /// Public path open, whitelist path closed.
    Public,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Paused => write!(f, "Paused"),
            Phase::Presale => write!(f, "Presale"),
            Phase::Public => write!(f, "Public"),
        }
    }
}

/// Gate, pool, and counter state for one sale.
#[derive(Debug, Clone)]
pub struct AllocationState {
    supply_ceiling: u64,
    issued_count: u64,
    reserved_pool: u64,
    presale_pool: u64,
    per_wallet_count: HashMap<Address, u64>,
    unit_price: Wei,
    per_wallet_limit: u64,
    paused: bool,
    presale_active: bool,
    current_root: Hash32,
    hash_algorithm: HashAlgorithm,
    /// Native value retained from mints and not yet withdrawn.
    balance: Wei,
}

/// Serializable summary of [`AllocationState`], minus the per-wallet map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSnapshot {
    pub phase: Phase,
    pub supply_ceiling: u64,
    pub issued_count: u64,
    pub reserved_pool: u64,
    pub presale_pool: u64,
    #[serde(with = "mintgate_protocol::config::wei_string")]
    pub unit_price: Wei,
    pub per_wallet_limit: u64,
    pub paused: bool,
    pub presale_active: bool,
    #[serde(with = "hex32")]
    pub merkle_root: Hash32,
    pub hash_algorithm: HashAlgorithm,
    #[serde(with = "mintgate_protocol::config::wei_string")]
    pub balance: Wei,
}

impl AllocationState {
    /// Initial state for a deployment. Nothing has been issued yet.
    pub fn from_config(config: &DeploymentConfig) -> Self {
        Self {
            supply_ceiling: config.supply_ceiling,
            issued_count: 0,
            reserved_pool: config.reserved_pool,
            presale_pool: config.presale_pool,
            per_wallet_count: HashMap::new(),
            unit_price: config.unit_price,
            per_wallet_limit: config.per_wallet_limit,
            paused: config.start_paused,
            presale_active: config.start_in_presale,
            current_root: config.merkle_root,
            hash_algorithm: config.hash_algorithm,
            balance: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn supply_ceiling(&self) -> u64 {
        self.supply_ceiling
    }

    pub fn issued_count(&self) -> u64 {
        self.issued_count
    }

    pub fn reserved_pool(&self) -> u64 {
        self.reserved_pool
    }

    pub fn presale_pool(&self) -> u64 {
        self.presale_pool
    }

    pub fn unit_price(&self) -> Wei {
        self.unit_price
    }

    pub fn per_wallet_limit(&self) -> u64 {
        self.per_wallet_limit
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_presale_active(&self) -> bool {
        self.presale_active
    }

    pub fn current_root(&self) -> Hash32 {
        self.current_root
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn balance(&self) -> Wei {
        self.balance
    }

    /// Identifiers `wallet` has minted through the public path.
    pub fn minted_by(&self, wallet: &Address) -> u64 {
        self.per_wallet_count.get(wallet).copied().unwrap_or(0)
    }

    /// Identifiers still issuable before the ceiling.
    pub fn remaining_supply(&self) -> u64 {
        self.supply_ceiling - self.issued_count
    }

    pub fn phase(&self) -> Phase {
        if self.paused {
            Phase::Paused
        } else if self.presale_active {
            Phase::Presale
        } else {
            Phase::Public
        }
    }

    pub fn snapshot(&self) -> AllocationSnapshot {
        AllocationSnapshot {
            phase: self.phase(),
            supply_ceiling: self.supply_ceiling,
            issued_count: self.issued_count,
            reserved_pool: self.reserved_pool,
            presale_pool: self.presale_pool,
            unit_price: self.unit_price,
            per_wallet_limit: self.per_wallet_limit,
            paused: self.paused,
            presale_active: self.presale_active,
            merkle_root: self.current_root,
            hash_algorithm: self.hash_algorithm,
            balance: self.balance,
        }
    }

    /// Verifies `proof` for `wallet` against the active root.
    pub fn is_whitelisted(&self, wallet: &Address, proof: &Proof) -> bool {
        merkle::verify(self.hash_algorithm, wallet, proof, &self.current_root)
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    /// `issued_count + n <= supply_ceiling`.
    pub fn check_issue(&self, n: u64) -> Result<(), MintError> {
        let exceeded = MintError::SupplyExceeded {
            issued: self.issued_count,
            requested: n,
            ceiling: self.supply_ceiling,
        };
        match self.issued_count.checked_add(n) {
            Some(total) if total <= self.supply_ceiling => Ok(()),
            _ => Err(exceeded),
        }
    }

    /// Public path: open, not in presale, within wallet cap and ceiling.
    pub fn check_public_mint(&self, wallet: &Address, n: u64) -> Result<(), MintError> {
        if self.paused {
            return Err(MintError::Paused);
        }
        if self.presale_active {
            return Err(MintError::PresaleActive);
        }
        if n == 0 {
            return Err(MintError::ZeroAmount);
        }
        let minted = self.minted_by(wallet);
        match minted.checked_add(n) {
            Some(total) if total <= self.per_wallet_limit => {}
            _ => {
                return Err(MintError::WalletLimitExceeded {
                    minted,
                    requested: n,
                    limit: self.per_wallet_limit,
                })
            }
        }
        self.check_issue(n)
    }

    /// Whitelist path: open, in presale, proof valid, within pool and ceiling.
    pub fn check_whitelist_mint(
        &self,
        wallet: &Address,
        n: u64,
        proof: &Proof,
    ) -> Result<(), MintError> {
        if self.paused {
            return Err(MintError::Paused);
        }
        if !self.presale_active {
            return Err(MintError::PresaleInactive);
        }
        if n == 0 {
            return Err(MintError::ZeroAmount);
        }
        if !self.is_whitelisted(wallet, proof) {
            return Err(MintError::NotWhitelisted { caller: *wallet });
        }
        if n > self.presale_pool {
            return Err(MintError::PresalePoolExceeded {
                requested: n,
                available: self.presale_pool,
            });
        }
        self.check_issue(n)
    }

    /// Give-away path, minus the privilege check which belongs to the
    /// controller.
    pub fn check_give_away(&self, target: &Address, n: u64) -> Result<(), MintError> {
        if target.is_zero() {
            return Err(MintError::NullTarget);
        }
        if n == 0 {
            return Err(MintError::ZeroGiveAway);
        }
        if n > self.reserved_pool {
            return Err(MintError::ReservedPoolExceeded {
                requested: n,
                available: self.reserved_pool,
            });
        }
        self.check_issue(n)
    }

    pub fn can_issue(&self, n: u64) -> bool {
        self.check_issue(n).is_ok()
    }

    pub fn can_public_mint(&self, wallet: &Address, n: u64) -> bool {
        self.check_public_mint(wallet, n).is_ok()
    }

    pub fn can_whitelist_mint(&self, wallet: &Address, n: u64, proof: &Proof) -> bool {
        self.check_whitelist_mint(wallet, n, proof).is_ok()
    }

    pub fn can_give_away(&self, target: &Address, n: u64) -> bool {
        self.check_give_away(target, n).is_ok()
    }

    /// Room left in the balance for `retained` more wei.
    pub(crate) fn check_credit(&self, retained: Wei) -> Result<(), MintError> {
        match self.balance.checked_add(retained) {
            Some(_) => Ok(()),
            None => Err(MintError::Overflow),
        }
    }

    // -----------------------------------------------------------------------
    // Commits (controller only, after guards pass)
    // -----------------------------------------------------------------------

    /// Bumps the global counter and returns the freshly issued range.
    fn issue(&mut self, n: u64) -> Range<TokenId> {
        debug_assert!(self.can_issue(n), "issue({n}) past the ceiling");
        let start = self.issued_count;
        self.issued_count += n;
        start..self.issued_count
    }

    /// Requires `check_public_mint` and `check_credit` to have passed.
    pub(crate) fn commit_public_mint(
        &mut self,
        wallet: Address,
        n: u64,
        retained: Wei,
    ) -> Range<TokenId> {
        debug_assert!(self.can_public_mint(&wallet, n));
        debug_assert!(self.check_credit(retained).is_ok());
        let ids = self.issue(n);
        *self.per_wallet_count.entry(wallet).or_insert(0) += n;
        self.balance += retained;
        ids
    }

    /// Requires `check_whitelist_mint` and `check_credit` to have passed.
    /// The proof is not looked at again.
    pub(crate) fn commit_whitelist_mint(&mut self, n: u64, retained: Wei) -> Range<TokenId> {
        debug_assert!(n <= self.presale_pool);
        debug_assert!(self.check_credit(retained).is_ok());
        let ids = self.issue(n);
        self.presale_pool -= n;
        self.balance += retained;
        ids
    }

    /// Requires `check_give_away` to have passed.
    pub(crate) fn commit_give_away(&mut self, target: Address, n: u64) -> Range<TokenId> {
        debug_assert!(self.can_give_away(&target, n));
        let ids = self.issue(n);
        self.reserved_pool -= n;
        ids
    }

    /// Deployment-time issuance outside every pool. The config's validation
    /// bounds `n` by the ceiling.
    pub(crate) fn commit_genesis(&mut self, n: u64) -> Range<TokenId> {
        self.issue(n)
    }

    /// Swaps the root and *adds* to the presale pool.
    pub(crate) fn rotate_presale(
        &mut self,
        root: Hash32,
        additional: u64,
    ) -> Result<(), MintError> {
        let pool = self
            .presale_pool
            .checked_add(additional)
            .ok_or(MintError::Overflow)?;
        self.current_root = root;
        self.presale_pool = pool;
        Ok(())
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn set_presale_active(&mut self, active: bool) {
        self.presale_active = active;
    }

    pub(crate) fn set_unit_price(&mut self, price: Wei) {
        self.unit_price = price;
    }

    pub(crate) fn set_per_wallet_limit(&mut self, limit: u64) {
        self.per_wallet_limit = limit;
    }

    /// Empties the balance and returns what was in it.
    pub(crate) fn drain_balance(&mut self) -> Wei {
        std::mem::take(&mut self.balance)
    }
}
