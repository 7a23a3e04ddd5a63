//! # Logging
//!
//! One `tracing` subscriber per process, installed by `main` before any
//! subcommand runs. Offline subcommands default to warnings only; `serve`
//! logs every accepted mint and admin change.
//!
//! Events go to stderr. Stdout carries only what the CLI prints on purpose:
//! roots, proof summaries and `true`/`false` from `check`.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Colored lines with file and line number.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Filter used by `serve` when `RUST_LOG` is unset.
pub const SERVE_FILTER: &str = "mintgate=info,mintgate_contracts=info,tower_http=debug";

/// Filter used by the offline subcommands when `RUST_LOG` is unset.
pub const OFFLINE_FILTER: &str = "mintgate=warn";

/// Installs the global subscriber. `RUST_LOG` wins over `fallback`.
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(fallback: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
    }

    tracing::debug!(?format, "subscriber installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_an_error() {
        // Either this call or another test's installed the subscriber first.
        let _ = init_logging(OFFLINE_FILTER, LogFormat::Pretty);
        assert!(init_logging(OFFLINE_FILTER, LogFormat::Json).is_err());
    }
}
