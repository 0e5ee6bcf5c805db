//! Logging setup.
//!
//! Diagnostics go to stderr so stdout stays clean for URLs and JSON output.
//! The filter comes from `ISSUE_HELPER_LOG` when set, otherwise from the
//! `-v` count.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "ISSUE_HELPER_LOG";

/// Filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "issue_helper=warn",
        1 => "issue_helper=info",
        2 => "issue_helper=debug",
        _ => "issue_helper=trace",
    }
}

fn build_env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Install the global subscriber. A second call leaves the first in place.
pub fn init(verbosity: u8) {
    let result = tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {e}");
    }
}
