//! Tracing subscriber setup for the CLI.
//!
//! Diagnostics go to stderr so table and JSON output on stdout stay clean.
//! `RUST_LOG` wins over the level implied by `--verbose`.

use std::io;

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `RUST_LOG` nor `--verbose` is supplied.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "warn";
/// Level used with `--verbose`.
pub(crate) const VERBOSE_LOG_LEVEL: &str = "debug";

/// Install the global tracing subscriber.
pub(crate) fn init_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_env_filter(level_for(verbose)))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

const fn level_for(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    }
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
