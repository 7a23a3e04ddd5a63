//! # Deployment Configuration & Constants
//!
//! Every default Mintgate ships with lives here, next to the document that
//! overrides them. A deployment is described once, at startup, by a
//! [`DeploymentConfig`]; after that only the privileged setters on the
//! controller can change anything, and the supply ceiling never changes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::crypto::hash::HashAlgorithm;
use crate::types::{hex32, Address, Hash32, Wei};

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

/// Participant address width in bytes. EVM-shaped.
pub const ADDRESS_LENGTH: usize = 20;

/// Hash output length in bytes. All supported algorithms produce 32 bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Sale Defaults
// ---------------------------------------------------------------------------

/// One ether, in wei.
pub const WEI_PER_ETHER: Wei = 1_000_000_000_000_000_000;

/// Default unit price: 0.06 ether.
pub const DEFAULT_UNIT_PRICE_WEI: Wei = 60_000_000_000_000_000;

/// Default public-path cap per wallet.
pub const DEFAULT_PER_WALLET_LIMIT: u64 = 2;

/// Identifiers issued to the beneficiary at deployment, outside every pool.
pub const DEFAULT_GENESIS_ALLOCATION: u64 = 0;

// ---------------------------------------------------------------------------
// Service Defaults
// ---------------------------------------------------------------------------

/// Default HTTP API port for `mintgate serve`.
pub const DEFAULT_API_PORT: u16 = 9840;

/// Default Prometheus metrics port.
pub const DEFAULT_METRICS_PORT: u16 = 9841;

// ---------------------------------------------------------------------------
// DeploymentConfig
// ---------------------------------------------------------------------------

/// Errors from loading or validating a deployment document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid deployment document.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but describes an impossible deployment.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to stand up a sale.
///
/// Field names are camelCase on the wire so the same JSON can be shared with
/// the scripts that compute the Merkle root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// The single privileged principal.
    pub owner: Address,
    /// Where `withdraw` sends accumulated value. Fixed for the deployment.
    pub beneficiary: Address,
    /// Maximum identifiers ever issuable. Immutable.
    pub supply_ceiling: u64,
    /// Administrator-only give-away pool.
    pub reserved_pool: u64,
    /// Initial whitelist-phase pool.
    pub presale_pool: u64,
    /// Initial whitelist root.
    #[serde(with = "hex32")]
    pub merkle_root: Hash32,
    /// Hash function the whitelist tree was built with.
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    /// Price per identifier, in wei. Serialized as a decimal string because
    /// JSON numbers cannot carry a u128 safely.
    #[serde(default = "default_unit_price", with = "wei_string")]
    pub unit_price: Wei,
    #[serde(default = "default_per_wallet_limit")]
    pub per_wallet_limit: u64,
    #[serde(default)]
    pub genesis_allocation: u64,
    #[serde(default = "default_true")]
    pub start_paused: bool,
    #[serde(default = "default_true")]
    pub start_in_presale: bool,
}

fn default_unit_price() -> Wei {
    DEFAULT_UNIT_PRICE_WEI
}

fn default_per_wallet_limit() -> u64 {
    DEFAULT_PER_WALLET_LIMIT
}

fn default_true() -> bool {
    true
}

impl DeploymentConfig {
    /// A config with every optional field at its default.
    pub fn new(
        owner: Address,
        beneficiary: Address,
        supply_ceiling: u64,
        reserved_pool: u64,
        presale_pool: u64,
        merkle_root: Hash32,
    ) -> Self {
        Self {
            owner,
            beneficiary,
            supply_ceiling,
            reserved_pool,
            presale_pool,
            merkle_root,
            hash_algorithm: HashAlgorithm::default(),
            unit_price: DEFAULT_UNIT_PRICE_WEI,
            per_wallet_limit: DEFAULT_PER_WALLET_LIMIT,
            genesis_allocation: DEFAULT_GENESIS_ALLOCATION,
            start_paused: true,
            start_in_presale: true,
        }
    }

    /// Reads and validates a JSON deployment document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: DeploymentConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(
            path = %path.as_ref().display(),
            ceiling = config.supply_ceiling,
            "deployment config loaded"
        );
        Ok(config)
    }

    /// Rejects deployments that could never honour their own pools.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() {
            return Err(ConfigError::Invalid("owner must not be the zero address".into()));
        }
        if self.beneficiary.is_zero() {
            return Err(ConfigError::Invalid(
                "beneficiary must not be the zero address".into(),
            ));
        }
        if self.supply_ceiling == 0 {
            return Err(ConfigError::Invalid("supplyCeiling must be at least 1".into()));
        }
        let committed = self
            .reserved_pool
            .checked_add(self.presale_pool)
            .and_then(|n| n.checked_add(self.genesis_allocation))
            .ok_or_else(|| ConfigError::Invalid("pool sizes overflow".into()))?;
        if committed > self.supply_ceiling {
            return Err(ConfigError::Invalid(format!(
                "reservedPool + presalePool + genesisAllocation = {committed} exceeds supplyCeiling {}",
                self.supply_ceiling
            )));
        }
        Ok(())
    }
}

/// Serde adapter for wei amounts: written as decimal strings, read from
/// either strings or plain JSON integers.
pub mod wei_string {
    use super::Wei;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Wei, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Wei, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s.trim().parse::<Wei>().map_err(de::Error::custom),
            Raw::Number(n) => Ok(Wei::from(n)),
        }
    }
}
