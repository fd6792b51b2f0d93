//! Tracing setup for the binary
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `BITCLONE_LOG` takes an `EnvFilter` directive and wins over `-v`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV_VAR: &str = "BITCLONE_LOG";

/// Level implied by the number of `-v` flags
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_env_filter(verbosity: u8) -> EnvFilter {
    match std::env::var(LOG_ENV_VAR) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity))),
        _ => EnvFilter::new(level_for_verbosity(verbosity)),
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init_tracing(verbosity: u8) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    // already initialized (tests install their own)
    let _ = Registry::default()
        .with(build_env_filter(verbosity))
        .with(layer)
        .try_init();
}
