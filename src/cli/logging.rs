//! Subscriber setup for the binary.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Filter directive variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "FORTE_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Resolve the log filter: `FORTE_LOG`, then `RUST_LOG`, then `info`.
///
/// # Errors
/// Returns an error if `FORTE_LOG` holds an invalid directive.
pub fn env_filter() -> Result<EnvFilter> {
    std::env::var(LOG_ENV).map_or_else(
        |_| {
            Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)))
        },
        |directive| {
            EnvFilter::try_new(&directive)
                .with_context(|| format!("invalid {LOG_ENV} directive '{directive}'"))
        },
    )
}

/// Install a human-readable subscriber writing to stderr, leaving stdout for
/// command output.
///
/// # Errors
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_tracing() -> Result<()> {
    fmt()
        .with_env_filter(env_filter()?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
}
