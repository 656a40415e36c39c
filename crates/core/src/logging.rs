//! Tracing initialization for the server binary.
//!
//! Log output always goes to **stderr**: stdout carries the MCP protocol
//! stream, and anything written there corrupts the framing. The filter comes
//! from `ENGRAM_LOG` (falling back to `RUST_LOG` semantics) and defaults to
//! `info`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "ENGRAM_LOG";

/// Initialize the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| Error::config(format!("failed to initialize logging: {e}")))
}
