// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Mintgate
//!
//! Entry point for the `mintgate` binary. Parses CLI arguments, initializes
//! logging and metrics, and either works on whitelist files offline or serves
//! a sale over HTTP.
//!
//! The binary supports five subcommands:
//!
//! - `root`    — print the Merkle root of a whitelist
//! - `proofs`  — write a proof for every whitelisted address
//! - `check`   — verify one address and proof against a root
//! - `serve`   — host a sale behind the HTTP API
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;

use mintgate_contracts::MintController;
use mintgate_protocol::config::DeploymentConfig;
use mintgate_protocol::crypto::HashAlgorithm;
use mintgate_protocol::merkle::{self, MerkleTree, Proof};
use mintgate_protocol::types::hex32;
use mintgate_protocol::Address;

use cli::{Commands, MintgateCli};
use logging::LogFormat;
use metrics::MintMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = MintgateCli::parse();

    let (filter, format) = match &cli.command {
        Commands::Serve(args) => (logging::SERVE_FILTER, args.log_format),
        _ => (logging::OFFLINE_FILTER, LogFormat::Pretty),
    };
    logging::init_logging(filter, format)?;

    match cli.command {
        Commands::Root(args) => print_root(args),
        Commands::Proofs(args) => write_proofs(args),
        Commands::Check(args) => check_proof(args),
        Commands::Serve(args) => serve(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Reads a JSON array of hex addresses and builds its tree.
fn load_whitelist(path: &Path, hash: HashAlgorithm) -> Result<MerkleTree> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read whitelist {}", path.display()))?;
    let addresses: Vec<Address> = serde_json::from_str(&raw)
        .with_context(|| format!("whitelist {} is not a JSON address array", path.display()))?;
    let tree = MerkleTree::build(addresses, hash)
        .with_context(|| format!("whitelist {} is empty", path.display()))?;
    tracing::info!(leaves = tree.len(), depth = tree.depth(), %hash, "whitelist loaded");
    Ok(tree)
}

fn print_root(args: cli::RootArgs) -> Result<()> {
    let tree = load_whitelist(&args.whitelist, args.hash)?;
    println!("{}", hex32::encode(&tree.root()));
    Ok(())
}

fn write_proofs(args: cli::ProofsArgs) -> Result<()> {
    let tree = load_whitelist(&args.whitelist, args.hash)?;
    let book = tree.proofs();
    let json = serde_json::to_string_pretty(&book).context("failed to encode proof book")?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("failed to write proofs to {}", args.out.display()))?;

    println!("Proofs written.");
    println!("  Root     : {}", hex32::encode(&book.merkle_root));
    println!("  Leaves   : {}", book.proofs.len());
    println!("  Output   : {}", args.out.display());
    Ok(())
}

fn check_proof(args: cli::CheckArgs) -> Result<()> {
    let address: Address = args.address.parse().context("invalid --address")?;
    let root = hex32::decode(&args.root).context("invalid --root")?;
    let proof: Proof = serde_json::from_str(&args.proof).context("invalid --proof")?;

    let whitelisted = merkle::verify(args.hash, &address, &proof, &root);
    println!("{whitelisted}");
    Ok(())
}

/// Hosts the sale: API server and metrics endpoint until a shutdown signal.
async fn serve(args: cli::ServeArgs) -> Result<()> {
    let config = DeploymentConfig::load(&args.config)
        .with_context(|| format!("failed to load deployment {}", args.config.display()))?;
    let controller = MintController::deploy(&config).context("deployment rejected")?;

    tracing::info!(
        port = args.port,
        metrics_port = args.metrics_port,
        config = %args.config.display(),
        phase = %controller.phase(),
        "starting mintgate"
    );

    // --- Metrics ---
    let mint_metrics = Arc::new(MintMetrics::new().context("failed to register metrics")?);
    mint_metrics.observe(controller.state());

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        controller: Arc::new(Mutex::new(controller)),
        metrics: Arc::clone(&mint_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&mint_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        res = shutdown_signal() => {
            res?;
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("mintgate stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("mintgate {}", env!("CARGO_PKG_VERSION"));
    println!("rustc    {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?;
        tokio::select! {
            res = signal::ctrl_c() => res.context("failed to listen for Ctrl+C")?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await.context("failed to listen for Ctrl+C")?;

    Ok(())
}
