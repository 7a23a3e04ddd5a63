use std::collections::BTreeMap;

use crate::crypto::hash::{hash_leaf, hash_sorted_pair, HashAlgorithm};
use crate::types::{Address, Hash32};

use super::proof::{Proof, ProofBook};
use super::MerkleError;

/// A fully materialized whitelist tree.
///
/// Keeps every level in memory so proofs can be produced for any member.
/// This is the off-ledger half of the whitelist: the ledger itself only ever
/// sees [`MerkleTree::root`].
#[derive(Debug, Clone)]
pub struct MerkleTree {
    algorithm: HashAlgorithm,
    /// `levels[0]` holds the sorted leaf hashes, the last level holds the root.
    levels: Vec<Vec<Hash32>>,
    /// Member address -> index of its leaf in `levels[0]`.
    members: BTreeMap<Address, usize>,
}

impl MerkleTree {
    /// Builds a tree over `leaves`.
    ///
    /// Presentation order and duplicates do not affect the result: equal
    /// address sets always produce equal roots.
    ///
    /// # Errors
    ///
    /// Returns [`MerkleError::EmptyLeafSet`] if `leaves` yields nothing.
    pub fn build<I>(leaves: I, algorithm: HashAlgorithm) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = Address>,
    {
        let mut hashed: Vec<(Hash32, Address)> = leaves
            .into_iter()
            .map(|addr| (hash_leaf(algorithm, &addr), addr))
            .collect();
        if hashed.is_empty() {
            return Err(MerkleError::EmptyLeafSet);
        }

        hashed.sort_unstable();
        hashed.dedup_by(|a, b| a.0 == b.0);

        let members = hashed
            .iter()
            .enumerate()
            .map(|(index, (_, addr))| (*addr, index))
            .collect();

        let mut levels = vec![hashed.into_iter().map(|(h, _)| h).collect::<Vec<_>>()];
        while levels.last().map_or(false, |level| level.len() > 1) {
            let current = &levels[levels.len() - 1];
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_sorted_pair(algorithm, left, right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two elements"),
                })
                .collect();
            levels.push(next);
        }

        tracing::debug!(
            leaves = levels[0].len(),
            depth = levels.len() - 1,
            %algorithm,
            "merkle tree built"
        );

        Ok(Self {
            algorithm,
            levels,
            members,
        })
    }

    /// The commitment to publish.
    pub fn root(&self) -> Hash32 {
        // `build` guarantees at least one level with at least one node.
        self.levels[self.levels.len() - 1][0]
    }

    /// Hash algorithm the tree was built with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Number of distinct members.
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// Always `false`; an empty tree cannot be built.
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Number of pairing rounds between the leaves and the root.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Whether `address` is one of the leaves.
    pub fn contains(&self, address: &Address) -> bool {
        self.members.contains_key(address)
    }

    /// Member addresses in ascending byte order.
    pub fn members(&self) -> impl Iterator<Item = &Address> {
        self.members.keys()
    }

    /// Sibling path from `address`'s leaf up to the root.
    ///
    /// Levels where the node had no sibling are skipped, so the proof can be
    /// shorter than [`depth`](Self::depth). Returns `None` for non-members.
    pub fn prove(&self, address: &Address) -> Option<Proof> {
        let mut index = *self.members.get(address)?;
        let mut siblings = Vec::with_capacity(self.depth());

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if let Some(hash) = level.get(sibling) {
                siblings.push(*hash);
            }
            index /= 2;
        }

        Some(Proof::new(siblings))
    }

    /// Proofs for every member, keyed by address, plus the root.
    pub fn proofs(&self) -> ProofBook {
        let proofs = self
            .members
            .keys()
            .filter_map(|addr| self.prove(addr).map(|p| (*addr, p)))
            .collect();
        ProofBook {
            merkle_root: self.root(),
            algorithm: self.algorithm,
            proofs,
        }
    }
}
