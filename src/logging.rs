//! Tracing setup for hosts that do not install their own subscriber.

use crate::error::{Result, UpdaterError};
use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"standard_updater=info"`).
///
/// # Errors
///
/// Returns [`UpdaterError::Config`] if the directive is invalid or a global
/// subscriber is already installed.
pub fn init_logging(default_directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| UpdaterError::Config(format!("invalid log directive: {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| UpdaterError::Config(format!("cannot install log subscriber: {e}")))
}
