//! Logging setup.
//!
//! Human-readable `tracing` output on stderr; stdout is reserved for reports.
//! The filter comes from `SIGNALDASH_LOG`, falling back to `warn` globally and
//! `info` (or `debug` when verbose) for this crate.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "SIGNALDASH_LOG";

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,signaldash=debug"
    } else {
        "warn,signaldash=info"
    }
}

pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
