//! # Primitive Types
//!
//! Participant addresses, hash values, and the numeric units shared across
//! the workspace. Addresses are EVM-shaped (20 bytes) because the whitelist
//! tooling and the wallets feeding it speak that format, but nothing below
//! assumes a particular chain.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ADDRESS_LENGTH, HASH_OUTPUT_LENGTH};

/// A Merkle node or root. Always 32 bytes regardless of hash algorithm.
pub type Hash32 = [u8; HASH_OUTPUT_LENGTH];

/// Native value in the ledger's smallest denomination.
pub type Wei = u128;

/// Sequential token identifier. Issued from a single global counter.
pub type TokenId = u64;

/// Errors from parsing addresses and hashes out of text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The decoded value has the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Number of bytes the type requires.
        expected: usize,
        /// Number of bytes actually decoded.
        got: usize,
    },

    /// The input is not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// An opaque, fixed-width participant identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The null address. Never a valid issuance target.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Wraps raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw byte view, used as the leaf preimage.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// `true` for [`Address::ZERO`].
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Lowercase `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parses `0x`-prefixed (or bare) hex. Case-insensitive, so checksummed
    /// wallet addresses are accepted as-is.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        Ok(Self(decode_fixed::<ADDRESS_LENGTH>(s)?))
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], AddressError> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(body).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(AddressError::InvalidLength {
            expected: N,
            got: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Hex helpers for 32-byte hashes, usable with `#[serde(with = "hex32")]`.
pub mod hex32 {
    use super::{decode_fixed, AddressError, Hash32};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Renders a hash as lowercase `0x`-prefixed hex.
    pub fn encode(hash: &Hash32) -> String {
        format!("0x{}", hex::encode(hash))
    }

    /// Parses a `0x`-prefixed (or bare) 32-byte hex string.
    pub fn decode(s: &str) -> Result<Hash32, AddressError> {
        decode_fixed::<32>(s)
    }

    pub fn serialize<S: Serializer>(hash: &Hash32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash32, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_checksummed_address() {
        let addr: Address = "0x90F79bf6EB2c4f870365E785982E1f101E93b906".parse().unwrap();
        assert_eq!(addr.to_hex(), "0x90f79bf6eb2c4f870365e785982e1f101e93b906");
    }

    #[test]
    fn accepts_bare_hex() {
        let a = Address::from_hex("15d34aaf54267db7d7c367839aaf71a00a2c6a65").unwrap();
        let b = Address::from_hex("0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_short_address() {
        let err = Address::from_hex("0x1234").unwrap_err();
        assert_eq!(
            err,
            AddressError::InvalidLength {
                expected: 20,
                got: 2
            }
        );
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1u8; 20]).is_zero());
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::new([0xab; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn hex32_rejects_address_sized_input() {
        assert!(hex32::decode("0x90F79bf6EB2c4f870365E785982E1f101E93b906").is_err());
        let h = [7u8; 32];
        assert_eq!(hex32::decode(&hex32::encode(&h)).unwrap(), h);
    }
}
