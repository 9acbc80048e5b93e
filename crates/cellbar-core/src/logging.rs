#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual macros are re-exported so crates
//! built on `cellbar-core` log through one path. With `tracing-json` a JSON
//! subscriber can be installed, filtered by `RUST_LOG` (falling back to the
//! given default directive).
//!
//! Installation is idempotent: a second call reports that a global
//! subscriber already exists instead of panicking.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Error returned when a global subscriber could not be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingInitError(pub String);

impl std::fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.0)
    }
}

impl std::error::Error for LoggingInitError {}

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
#[cfg(feature = "tracing-json")]
pub fn init_json(default_directive: &str) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| LoggingInitError(err.to_string()))
}

/// Install a human-readable subscriber that writes through the test harness.
#[cfg(feature = "tracing-json")]
pub fn init_test_writer(default_directive: &str) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| LoggingInitError(err.to_string()))
}
