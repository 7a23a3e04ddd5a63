//! # CLI Interface
//!
//! Defines the command-line argument structure for `mintgate` using `clap`
//! derive. Three subcommands work on whitelist files offline (`root`,
//! `proofs`, `check`), `serve` hosts a sale, and `version` prints build info.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mintgate_protocol::config::{DEFAULT_API_PORT, DEFAULT_METRICS_PORT};
use mintgate_protocol::crypto::HashAlgorithm;

use crate::logging::LogFormat;

/// Allocation control for fixed-supply mints.
///
/// Builds whitelist Merkle roots and proofs, and serves a mint controller
/// over HTTP with Prometheus metrics.
#[derive(Parser, Debug)]
#[command(
    name = "mintgate",
    about = "Allocation control for fixed-supply mints",
    version,
    propagate_version = true
)]
pub struct MintgateCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `mintgate` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the Merkle root of a whitelist.
    Root(RootArgs),
    /// Write a proof for every whitelisted address to a JSON file.
    Proofs(ProofsArgs),
    /// Check one address and proof against a root.
    Check(CheckArgs),
    /// Host a sale behind the HTTP API.
    Serve(ServeArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `root` subcommand.
#[derive(Parser, Debug)]
pub struct RootArgs {
    /// JSON file holding an array of hex addresses.
    #[arg(long, short = 'w', env = "MINTGATE_WHITELIST")]
    pub whitelist: PathBuf,

    /// Hash function for leaves and interior nodes.
    #[arg(long, default_value_t = HashAlgorithm::Keccak256)]
    pub hash: HashAlgorithm,
}

/// Arguments for the `proofs` subcommand.
#[derive(Parser, Debug)]
pub struct ProofsArgs {
    /// JSON file holding an array of hex addresses.
    #[arg(long, short = 'w', env = "MINTGATE_WHITELIST")]
    pub whitelist: PathBuf,

    /// Where to write the proof book.
    #[arg(long, short = 'o')]
    pub out: PathBuf,

    /// Hash function for leaves and interior nodes.
    #[arg(long, default_value_t = HashAlgorithm::Keccak256)]
    pub hash: HashAlgorithm,
}

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Address to check.
    #[arg(long, short = 'a')]
    pub address: String,

    /// Proof as a JSON array of hex hashes, e.g. `["0xab..", "0xcd.."]`.
    #[arg(long, short = 'p', default_value = "[]")]
    pub proof: String,

    /// Hex-encoded Merkle root.
    #[arg(long, short = 'r')]
    pub root: String,

    /// Hash function the root was built with.
    #[arg(long, default_value_t = HashAlgorithm::Keccak256)]
    pub hash: HashAlgorithm,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Deployment config (JSON).
    #[arg(long, short = 'c', env = "MINTGATE_CONFIG")]
    pub config: PathBuf,

    /// Port for the HTTP API.
    #[arg(long, env = "MINTGATE_PORT", default_value_t = DEFAULT_API_PORT)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "MINTGATE_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log output format.
    #[arg(long, env = "MINTGATE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}
