//! # Merkle Whitelists
//!
//! A whitelist commitment that fits in 32 bytes. The full address list lives
//! off-ledger; the ledger only keeps the root, and callers bring a proof.
//!
//! ## Construction
//!
//! 1. Hash every address into a leaf.
//! 2. Sort and deduplicate the leaf hashes.
//! 3. Pair adjacent hashes level by level, hashing each pair in sorted order.
//!    An unpaired hash is promoted to the next level unchanged; it is never
//!    paired with a copy of itself.
//! 4. The last hash standing is the root.
//!
//! Sorting at step 2 makes the root a function of the *set* of addresses.
//! Sorting at step 3 makes proofs position-free: a proof is just a list of
//! sibling hashes, no direction bits.

mod proof;
mod tree;

pub use proof::{verify, verify_leaf_hash, Proof, ProofBook};
pub use tree::MerkleTree;

use thiserror::Error;

/// Errors from building a Merkle tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// A whitelist with nobody on it has no meaningful root.
    #[error("cannot build a Merkle tree from an empty leaf set")]
    EmptyLeafSet,
}
