//! # Mintgate Contracts
//!
//! The sale logic itself. Everything that decides whether an identifier gets
//! issued lives here:
//!
//! - **Allocation** — supply ceiling, reserved and presale pools, wallet
//!   caps, price, the two phase gates, and the guards that read them.
//! - **Controller** — the entry point for every mint and admin call. Checks,
//!   commits, then hands back any outgoing value as an explicit transfer.
//! - **Registry** — the ownership ledger that issuances get reported to.
//!
//! ## Design Principles
//!
//! 1. All counters use checked arithmetic. A request that would overflow is
//!    rejected, not wrapped.
//! 2. All-or-nothing: every guard runs before the first write.
//! 3. Counters move before value does. Refunds and withdrawals are returned
//!    to the host, never performed from inside a half-updated state.
//! 4. Admin calls compare the caller against the owner. There is no other
//!    notion of privilege.

pub mod allocation;
pub mod controller;
pub mod error;
pub mod registry;

pub use allocation::{AllocationSnapshot, AllocationState, Phase};
pub use controller::{MintController, MintReceipt, Transfer, TransferKind};
pub use error::{ErrorCategory, MintError};
pub use registry::{OwnershipRegistry, TokenLedger};
