//! # Hashing Utilities
//!
//! Three hash functions, one shape: everything returns a fixed 32-byte
//! digest so Merkle code never has to care which one is in play.
//!
//! - **Keccak-256** — Ethereum's `keccak256`. Not NIST SHA3-256; the padding
//!   differs. Default for whitelist trees because off-ledger tooling already
//!   speaks it.
//! - **SHA-256** — for interoperability with everything else.
//! - **BLAKE3** — fast, and fine when nobody outside needs to recompute
//!   the root.
//!
//! ## Leaves and pairs
//!
//! A leaf is always the hash of the address bytes, never the raw address.
//! Internal nodes hash their two children in sorted order, which is what lets
//! proofs skip left/right position flags entirely.

use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

use crate::types::{Address, Hash32};

/// Which hash function backs a Merkle tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// Ethereum-style Keccak-256.
    #[default]
    Keccak256,
    /// SHA-256.
    Sha256,
    /// BLAKE3.
    Blake3,
}

impl HashAlgorithm {
    /// Hashes a single buffer.
    pub fn digest(self, data: &[u8]) -> Hash32 {
        match self {
            HashAlgorithm::Keccak256 => keccak256(data),
            HashAlgorithm::Sha256 => sha256(data),
            HashAlgorithm::Blake3 => blake3_hash(data),
        }
    }

    /// Hashes `a || b` without building the concatenation.
    fn digest_pair(self, a: &Hash32, b: &Hash32) -> Hash32 {
        match self {
            HashAlgorithm::Keccak256 => {
                let mut hasher = Keccak256::new();
                hasher.update(a);
                hasher.update(b);
                to_hash32(&hasher.finalize())
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(a);
                hasher.update(b);
                to_hash32(&hasher.finalize())
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(a);
                hasher.update(b);
                *hasher.finalize().as_bytes()
            }
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Keccak256 => write!(f, "keccak256"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(HashAlgorithm::Keccak256),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!("unknown hash algorithm: {other}")),
        }
    }
}

/// Keccak-256 of the input, as Ethereum computes it.
///
/// # Example
///
/// ```
/// use mintgate_protocol::crypto::keccak256;
///
/// let hash = keccak256(b"");
/// assert_eq!(hash[0], 0xc5);
/// ```
pub fn keccak256(data: &[u8]) -> Hash32 {
    to_hash32(&Keccak256::digest(data))
}

/// SHA-256 of the input.
pub fn sha256(data: &[u8]) -> Hash32 {
    to_hash32(&Sha256::digest(data))
}

/// BLAKE3 of the input.
pub fn blake3_hash(data: &[u8]) -> Hash32 {
    *blake3::hash(data).as_bytes()
}

fn to_hash32(digest: &[u8]) -> Hash32 {
    let mut output = [0u8; 32];
    output.copy_from_slice(digest);
    output
}

/// Leaf hash for a whitelisted address.
///
/// Hashing the leaf keeps a 20-byte address from ever being confused with
/// a 32-byte internal node.
pub fn hash_leaf(algo: HashAlgorithm, address: &Address) -> Hash32 {
    algo.digest(address.as_bytes())
}

/// Combines two nodes under the canonical ordering: smaller value first.
///
/// Byte-wise comparison of big-endian digests is the same as numeric
/// comparison, so this matches what EVM verifiers do with `a < b`.
pub fn hash_sorted_pair(algo: HashAlgorithm, a: &Hash32, b: &Hash32) -> Hash32 {
    if a <= b {
        algo.digest_pair(a, b)
    } else {
        algo.digest_pair(b, a)
    }
}
