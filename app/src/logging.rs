//! Logging setup shared by every binary.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a console subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn setup_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .try_init()
        .ok();

    Ok(())
}
