//! Tracing initialization.
//!
//! Logs go to stderr so that stdout carries only command output (text or `--json`). The level is
//! controlled with `RUST_LOG` and defaults to `info`, e.g.
//!
//! ```bash
//! RUST_LOG=spjp=debug spjp badges
//! ```

use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber: an env filter plus a fmt layer on stderr.
///
/// Fails if a global subscriber is already set.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    debug!("Telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call comes first may win; at most one can succeed in a process
        let first = init_telemetry();
        let second = init_telemetry();
        assert!(first.is_err() || second.is_err());
    }
}
