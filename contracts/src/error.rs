//! Error types for the mint controller.
//!
//! Every rejected operation returns exactly one [`MintError`] and leaves all
//! state untouched. Variants are fine-grained so callers can tell failures
//! apart; [`MintError::reason`] maps each one back to the short reason code
//! wallets and front ends already match on.

use serde::Serialize;
use thiserror::Error;

use mintgate_protocol::{Address, Wei};

/// Broad class of a failure, for callers that only need to know who is at
/// fault and whether retrying with different inputs could help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The caller is not allowed to take this path right now.
    Entitlement,
    /// A pool, the ceiling, or a wallet cap would be exceeded.
    Capacity,
    /// Attached value does not cover the price.
    Payment,
    /// The request itself is malformed.
    Argument,
}

/// Errors that can occur during mint and administrative operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    /// A privileged operation was called by someone other than the owner.
    #[error("unauthorized: {caller} is not the owner")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// Minting is globally paused.
    #[error("minting is paused")]
    Paused,

    /// The public path is closed while the presale runs.
    #[error("public mint is closed during the presale")]
    PresaleActive,

    /// The whitelist path only opens during the presale.
    #[error("whitelist mint requires an active presale")]
    PresaleInactive,

    /// The caller's proof does not reproduce the active root.
    #[error("{caller} is not on the active whitelist")]
    NotWhitelisted {
        /// The caller whose proof failed.
        caller: Address,
    },

    /// A mint asked for zero identifiers.
    #[error("mint amount must be at least 1")]
    ZeroAmount,

    /// The caller would exceed the per-wallet public mint cap.
    #[error("wallet limit exceeded: already minted {minted}, requested {requested}, limit {limit}")]
    WalletLimitExceeded {
        /// Count already minted through the public path.
        minted: u64,
        /// Amount requested in this call.
        requested: u64,
        /// Current per-wallet limit.
        limit: u64,
    },

    /// Attached value is below `unit_price * amount`.
    #[error("insufficient payment: required {required} wei, paid {paid} wei")]
    InsufficientPayment {
        /// Total price for the requested amount.
        required: Wei,
        /// Value actually attached.
        paid: Wei,
    },

    /// Issuing would push the issued count past the supply ceiling.
    #[error("supply ceiling exceeded: {issued} issued, requested {requested}, ceiling {ceiling}")]
    SupplyExceeded {
        /// Identifiers issued so far.
        issued: u64,
        /// Amount requested in this call.
        requested: u64,
        /// Immutable supply ceiling.
        ceiling: u64,
    },

    /// The whitelist pool cannot cover the request.
    #[error("presale pool exhausted: requested {requested}, available {available}")]
    PresalePoolExceeded {
        /// Amount requested in this call.
        requested: u64,
        /// Remaining presale pool.
        available: u64,
    },

    /// The reserved pool cannot cover the give-away.
    #[error("reserved pool exhausted: requested {requested}, available {available}")]
    ReservedPoolExceeded {
        /// Amount requested in this call.
        requested: u64,
        /// Remaining reserved pool.
        available: u64,
    },

    /// A give-away asked for zero identifiers.
    #[error("give-away amount must be at least 1")]
    ZeroGiveAway,

    /// A give-away targeted the null address.
    #[error("give-away target must not be the zero address")]
    NullTarget,

    /// A counter or pool would overflow its integer type.
    #[error("arithmetic overflow")]
    Overflow,
}

impl MintError {
    /// The short reason code for this failure.
    ///
    /// Several variants share a code (`!BoredAmount`, `!presale`); the
    /// variant itself is what distinguishes them.
    pub fn reason(&self) -> &'static str {
        match self {
            MintError::Unauthorized { .. } => "Ownable: caller is not the owner",
            MintError::Paused => "Paused",
            MintError::PresaleActive | MintError::PresaleInactive => "!presale",
            MintError::NotWhitelisted { .. } => "!whitelist",
            MintError::ZeroAmount | MintError::WalletLimitExceeded { .. } => "!BoredAmount",
            MintError::InsufficientPayment { .. } => "!EthAmount",
            MintError::SupplyExceeded { .. } => ">MaxSupply",
            MintError::PresalePoolExceeded { .. } => ">availableSupply",
            MintError::ReservedPoolExceeded { .. } => ">reserved",
            MintError::ZeroGiveAway => "_amount==0",
            MintError::NullTarget => "_to==0",
            MintError::Overflow => "overflow",
        }
    }

    /// Which taxonomy bucket this failure belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MintError::Unauthorized { .. }
            | MintError::Paused
            | MintError::PresaleActive
            | MintError::PresaleInactive
            | MintError::NotWhitelisted { .. } => ErrorCategory::Entitlement,
            MintError::WalletLimitExceeded { .. }
            | MintError::SupplyExceeded { .. }
            | MintError::PresalePoolExceeded { .. }
            | MintError::ReservedPoolExceeded { .. }
            | MintError::Overflow => ErrorCategory::Capacity,
            MintError::InsufficientPayment { .. } => ErrorCategory::Payment,
            MintError::ZeroAmount | MintError::ZeroGiveAway | MintError::NullTarget => {
                ErrorCategory::Argument
            }
        }
    }
}
