//! Logging setup
//!
//! Terraform owns stdout, so all output goes to stderr.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, filtering at `info` unless `RUST_LOG` says otherwise
pub fn init() {
    init_with_default("info");
}

/// Install the global subscriber with a fallback filter directive.
/// Calling this more than once is harmless.
pub fn init_with_default(directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
