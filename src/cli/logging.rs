//! Log output for the command-line binary

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CHAIN_LOG=debug`
pub const LOG_ENV: &str = "CHAIN_LOG";

/// Filter used when `CHAIN_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,chain_journal=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber writing to stderr.
///
/// Calling it again is harmless; only the first subscriber is kept.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
