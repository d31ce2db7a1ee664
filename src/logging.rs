//! Logging configuration for sqlview.
//!
//! Logs go to stderr so they never interleave with the rendered results on
//! stdout. `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Returns the default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "sqlview=debug,info"
    } else {
        "warn"
    }
}

/// Initializes stderr logging.
pub fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}
