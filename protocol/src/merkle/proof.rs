use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::crypto::hash::{hash_leaf, hash_sorted_pair, HashAlgorithm};
use crate::types::{hex32, Address, AddressError, Hash32};

/// Sibling hashes from a leaf up to the root.
///
/// No direction bits: pairs are hashed in sorted order, so the verifier
/// never needs to know which side a sibling sat on. Serializes as a JSON
/// array of `0x`-prefixed hex strings, the same shape off-ledger scripts emit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proof(Vec<Hash32>);

impl Proof {
    pub fn new(siblings: Vec<Hash32>) -> Self {
        Self(siblings)
    }

    pub fn siblings(&self) -> &[Hash32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a list of hex strings.
    pub fn from_hex<S: AsRef<str>>(items: &[S]) -> Result<Self, AddressError> {
        items
            .iter()
            .map(|s| hex32::decode(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Renders as a list of hex strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(hex32::encode).collect()
    }
}

impl From<Vec<Hash32>> for Proof {
    fn from(siblings: Vec<Hash32>) -> Self {
        Self(siblings)
    }
}

impl Serialize for Proof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Proof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<String>::deserialize(deserializer)?;
        Proof::from_hex(&items).map_err(serde::de::Error::custom)
    }
}

/// Checks that `address` is committed to by `root`.
///
/// Pure and total: any proof, of any length, against any root, yields a
/// plain `bool`. A malformed or mismatched proof simply fails to reproduce
/// the root.
pub fn verify(algo: HashAlgorithm, address: &Address, proof: &Proof, root: &Hash32) -> bool {
    verify_leaf_hash(algo, hash_leaf(algo, address), proof, root)
}

/// Same as [`verify`] but starting from an already-hashed leaf.
pub fn verify_leaf_hash(algo: HashAlgorithm, leaf: Hash32, proof: &Proof, root: &Hash32) -> bool {
    let computed = proof
        .siblings()
        .iter()
        .fold(leaf, |acc, sibling| hash_sorted_pair(algo, &acc, sibling));
    computed == *root
}

/// Every member's proof together with the root they prove against.
///
/// The JSON form is what gets handed to a minting front end:
///
/// ```json
/// { "merkleRoot": "0x…", "algorithm": "keccak256", "proofs": { "0x…": ["0x…"] } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofBook {
    #[serde(with = "hex32")]
    pub merkle_root: Hash32,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    pub proofs: BTreeMap<Address, Proof>,
}

impl ProofBook {
    /// Proof for one address, if it is in the book.
    pub fn get(&self, address: &Address) -> Option<&Proof> {
        self.proofs.get(address)
    }
}
