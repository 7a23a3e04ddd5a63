//! # Cryptographic Primitives for Mintgate
//!
//! Hashing only. Mintgate never signs or encrypts anything itself: caller
//! identity is established by the ledger in front of us, and the only
//! cryptographic claim we check is Merkle membership.
//!
//! - **Keccak-256** is the default, so roots line up with what EVM tooling
//!   and existing whitelist scripts produce.
//! - **SHA-256** and **BLAKE3** are available for deployments that do not
//!   need EVM compatibility.

pub mod hash;

pub use hash::{blake3_hash, hash_leaf, hash_sorted_pair, keccak256, sha256, HashAlgorithm};
