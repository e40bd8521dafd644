//! Logging init: stderr with an env-filterable level.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
///
/// `RUST_LOG` overrides the default filter. The converter is a one-shot
/// tool, so there is no file sink; diagnostics share stderr with error
/// reporting and stay out of stdout.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inv2tag_core=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
