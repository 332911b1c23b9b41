//! Logging configuration
//!
//! Diagnostics go to stderr so stdout carries only command results.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes logging with the specified level. `RUST_LOG` takes precedence.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // a second initialisation (e.g. from tests) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging("debug");
        init_logging("warn");
    }
}
