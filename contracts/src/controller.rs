//! # Mint Controller
//!
//! The only way in. Every mint, give-away, and configuration change goes
//! through a method here, which:
//!
//! 1. checks the caller is entitled (owner for admin calls, proof for the
//!    whitelist path, open gates for everything that mints),
//! 2. checks pools, caps, ceiling, and payment,
//! 3. commits the counters in one step,
//! 4. reports the issuance to the [`TokenLedger`],
//! 5. and only then hands back any value that has to leave the sale
//!    (refunds, withdrawals) as an explicit [`Transfer`].
//!
//! A call that fails at any step before 3 changes nothing. Steps 3–5 cannot
//! fail once the guards have passed.
//!
//! The controller is `&mut self` throughout and holds no locks. Hosts that
//! share it between threads wrap the whole thing in one mutex so that guard
//! evaluation and commit stay a single atomic step.

use serde::Serialize;
use std::ops::Range;

use mintgate_protocol::config::{ConfigError, DeploymentConfig};
use mintgate_protocol::merkle::Proof;
use mintgate_protocol::types::hex32;
use mintgate_protocol::{Address, Hash32, TokenId, Wei};

use crate::allocation::{AllocationSnapshot, AllocationState, Phase};
use crate::error::MintError;
use crate::registry::{OwnershipRegistry, TokenLedger};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Why value is leaving the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// Overpayment returned to the minter.
    Refund,
    /// Accumulated proceeds swept to the beneficiary.
    Withdrawal,
}

/// An outgoing value movement the host must execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub to: Address,
    #[serde(with = "mintgate_protocol::config::wei_string")]
    pub amount: Wei,
    pub kind: TransferKind,
}

/// Result of a successful issuing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintReceipt {
    /// Recipient of the new identifiers.
    pub to: Address,
    /// Issued identifiers, contiguous and in order.
    pub ids: Range<TokenId>,
    /// Value kept by the sale for this call.
    #[serde(with = "mintgate_protocol::config::wei_string")]
    pub charged: Wei,
    /// Overpayment to send back, if any.
    pub refund: Option<Transfer>,
}

impl MintReceipt {
    pub fn count(&self) -> u64 {
        self.ids.end - self.ids.start
    }
}

// ---------------------------------------------------------------------------
// MintController
// ---------------------------------------------------------------------------

/// Orchestrates every state-changing request against one sale.
#[derive(Debug, Clone)]
pub struct MintController<L: TokenLedger = OwnershipRegistry> {
    owner: Address,
    beneficiary: Address,
    state: AllocationState,
    ledger: L,
}

impl MintController<OwnershipRegistry> {
    /// Deploys a sale backed by an in-memory [`OwnershipRegistry`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn deploy(config: &DeploymentConfig) -> Result<Self, ConfigError> {
        Self::deploy_with_ledger(config, OwnershipRegistry::new())
    }
}

impl<L: TokenLedger> MintController<L> {
    /// Deploys a sale that reports issuances to `ledger`.
    ///
    /// Issues `config.genesis_allocation` identifiers to the beneficiary
    /// before returning. Those come from outside every pool.
    pub fn deploy_with_ledger(config: &DeploymentConfig, ledger: L) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut controller = Self {
            owner: config.owner,
            beneficiary: config.beneficiary,
            state: AllocationState::from_config(config),
            ledger,
        };

        if config.genesis_allocation > 0 {
            let ids = controller.state.commit_genesis(config.genesis_allocation);
            controller.ledger.record_issuance(config.beneficiary, ids);
        }

        tracing::info!(
            owner = %config.owner,
            beneficiary = %config.beneficiary,
            ceiling = config.supply_ceiling,
            reserved = config.reserved_pool,
            presale = config.presale_pool,
            genesis = config.genesis_allocation,
            "sale deployed"
        );

        Ok(controller)
    }

    // -----------------------------------------------------------------------
    // Minting
    // -----------------------------------------------------------------------

    /// Public-path mint of `amount` identifiers to `caller`.
    ///
    /// # Errors
    ///
    /// In evaluation order: [`MintError::Paused`], [`MintError::PresaleActive`],
    /// [`MintError::ZeroAmount`], [`MintError::WalletLimitExceeded`],
    /// [`MintError::SupplyExceeded`], [`MintError::InsufficientPayment`].
    pub fn public_mint(
        &mut self,
        caller: Address,
        amount: u64,
        paid: Wei,
    ) -> Result<MintReceipt, MintError> {
        self.try_public_mint(caller, amount, paid)
            .map_err(|e| rejected("public_mint", caller, e))
    }

    fn try_public_mint(
        &mut self,
        caller: Address,
        amount: u64,
        paid: Wei,
    ) -> Result<MintReceipt, MintError> {
        self.state.check_public_mint(&caller, amount)?;
        let charged = self.price_for(amount, paid)?;
        self.state.check_credit(charged)?;

        let ids = self.state.commit_public_mint(caller, amount, charged);
        let receipt = self.settle(caller, ids, charged, paid);

        tracing::info!(
            path = "public",
            to = %caller,
            first = receipt.ids.start,
            count = receipt.count(),
            charged = %receipt.charged,
            "minted"
        );
        Ok(receipt)
    }

    /// Whitelist-path mint of `amount` identifiers to `caller`.
    ///
    /// No wallet cap applies here: the presale pool is the cap.
    ///
    /// # Errors
    ///
    /// In evaluation order: [`MintError::Paused`], [`MintError::PresaleInactive`],
    /// [`MintError::ZeroAmount`], [`MintError::NotWhitelisted`],
    /// [`MintError::PresalePoolExceeded`], [`MintError::SupplyExceeded`],
    /// [`MintError::InsufficientPayment`].
    pub fn whitelist_mint(
        &mut self,
        caller: Address,
        amount: u64,
        proof: &Proof,
        paid: Wei,
    ) -> Result<MintReceipt, MintError> {
        self.try_whitelist_mint(caller, amount, proof, paid)
            .map_err(|e| rejected("whitelist_mint", caller, e))
    }

    fn try_whitelist_mint(
        &mut self,
        caller: Address,
        amount: u64,
        proof: &Proof,
        paid: Wei,
    ) -> Result<MintReceipt, MintError> {
        self.state.check_whitelist_mint(&caller, amount, proof)?;
        let charged = self.price_for(amount, paid)?;
        self.state.check_credit(charged)?;

        let ids = self.state.commit_whitelist_mint(amount, charged);
        let receipt = self.settle(caller, ids, charged, paid);

        tracing::info!(
            path = "whitelist",
            to = %caller,
            first = receipt.ids.start,
            count = receipt.count(),
            presale_pool = self.state.presale_pool(),
            "minted"
        );
        Ok(receipt)
    }

    /// Owner-only issuance from the reserved pool. No payment.
    pub fn give_away(
        &mut self,
        caller: Address,
        to: Address,
        amount: u64,
    ) -> Result<MintReceipt, MintError> {
        self.try_give_away(caller, to, amount)
            .map_err(|e| rejected("give_away", caller, e))
    }

    fn try_give_away(
        &mut self,
        caller: Address,
        to: Address,
        amount: u64,
    ) -> Result<MintReceipt, MintError> {
        self.require_owner(caller)?;
        self.state.check_give_away(&to, amount)?;

        let ids = self.state.commit_give_away(to, amount);
        self.ledger.record_issuance(to, ids.clone());

        tracing::info!(
            path = "give_away",
            to = %to,
            first = ids.start,
            count = amount,
            reserved_pool = self.state.reserved_pool(),
            "minted"
        );
        Ok(MintReceipt {
            to,
            ids,
            charged: 0,
            refund: None,
        })
    }

    // -----------------------------------------------------------------------
    // Administration
    // -----------------------------------------------------------------------

    /// Replaces the whitelist root and adds `additional` to the presale pool.
    ///
    /// The pool grows by `additional`; it is never reset. Pass zero to rotate
    /// the root alone. Every proof built against the previous root stops
    /// verifying the moment this returns.
    pub fn set_presale_params(
        &mut self,
        caller: Address,
        root: Hash32,
        additional: u64,
    ) -> Result<(), MintError> {
        self.admin("set_presale_params", caller)?;
        self.state
            .rotate_presale(root, additional)
            .map_err(|e| rejected("set_presale_params", caller, e))?;

        tracing::info!(
            root = %hex32::encode(&root),
            added = additional,
            presale_pool = self.state.presale_pool(),
            "presale params updated"
        );
        Ok(())
    }

    pub fn pause(&mut self, caller: Address, paused: bool) -> Result<(), MintError> {
        self.admin("pause", caller)?;
        self.state.set_paused(paused);
        tracing::info!(paused, "pause gate set");
        Ok(())
    }

    pub fn set_presale_active(&mut self, caller: Address, active: bool) -> Result<(), MintError> {
        self.admin("set_presale_active", caller)?;
        self.state.set_presale_active(active);
        tracing::info!(active, "presale gate set");
        Ok(())
    }

    pub fn set_price(&mut self, caller: Address, price: Wei) -> Result<(), MintError> {
        self.admin("set_price", caller)?;
        self.state.set_unit_price(price);
        tracing::info!(price = %price, "unit price set");
        Ok(())
    }

    pub fn set_per_wallet_limit(&mut self, caller: Address, limit: u64) -> Result<(), MintError> {
        self.admin("set_per_wallet_limit", caller)?;
        self.state.set_per_wallet_limit(limit);
        tracing::info!(limit, "per-wallet limit set");
        Ok(())
    }

    /// Sweeps the whole accumulated balance to the beneficiary.
    ///
    /// The balance is zeroed before the transfer is handed out.
    pub fn withdraw(&mut self, caller: Address) -> Result<Transfer, MintError> {
        self.admin("withdraw", caller)?;
        let amount = self.state.drain_balance();
        tracing::info!(to = %self.beneficiary, amount = %amount, "proceeds withdrawn");
        Ok(Transfer {
            to: self.beneficiary,
            amount,
            kind: TransferKind::Withdrawal,
        })
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Read-only whitelist check against the active root. Never fails.
    pub fn is_whitelisted(&self, address: &Address, proof: &Proof) -> bool {
        self.state.is_whitelisted(address, proof)
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn beneficiary(&self) -> Address {
        self.beneficiary
    }

    pub fn price(&self) -> Wei {
        self.state.unit_price()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    pub fn snapshot(&self) -> AllocationSnapshot {
        self.state.snapshot()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require_owner(&self, caller: Address) -> Result<(), MintError> {
        if caller != self.owner {
            return Err(MintError::Unauthorized { caller });
        }
        Ok(())
    }

    /// Owner check for setters that cannot fail otherwise.
    fn admin(&self, op: &'static str, caller: Address) -> Result<(), MintError> {
        self.require_owner(caller).map_err(|e| rejected(op, caller, e))
    }

    /// Total due for `amount`, or the payment error if `paid` falls short.
    fn price_for(&self, amount: u64, paid: Wei) -> Result<Wei, MintError> {
        // An unrepresentable total is more than anyone could have attached.
        let required = self
            .state
            .unit_price()
            .checked_mul(Wei::from(amount))
            .unwrap_or(Wei::MAX);
        if paid < required {
            return Err(MintError::InsufficientPayment { required, paid });
        }
        Ok(required)
    }

    /// Post-commit bookkeeping shared by both paid paths.
    fn settle(&mut self, to: Address, ids: Range<TokenId>, charged: Wei, paid: Wei) -> MintReceipt {
        self.ledger.record_issuance(to, ids.clone());
        let excess = paid - charged;
        let refund = (excess > 0).then_some(Transfer {
            to,
            amount: excess,
            kind: TransferKind::Refund,
        });
        MintReceipt {
            to,
            ids,
            charged,
            refund,
        }
    }
}

fn rejected(op: &'static str, caller: Address, err: MintError) -> MintError {
    tracing::debug!(op, caller = %caller, reason = err.reason(), error = %err, "rejected");
    err
}
