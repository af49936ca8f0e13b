//! Tracing setup for the studentctl CLI
//!
//! Usage:
//!   studentctl --debug                     # Debug logging to stderr
//!   RUST_LOG=studentctl_db=debug studentctl  # Fine-grained log control
//!
//! Logs always go to stderr so they never interleave with the menu on
//! stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the fallback level to debug)
    pub debug: bool,
}

impl TracingConfig {
    fn fallback_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Initialize console tracing. `RUST_LOG` wins over the fallback level.
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.fallback_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
