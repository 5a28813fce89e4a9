//! Logging initialization
//!
//! Controlled by `TWIG_LOG`, an `EnvFilter` directive string (for example
//! `debug` or `twig::artifacts::graph=trace`). Unset means logging is off.
//! Events go to stderr; stdout is reserved for command output.

use tracing_subscriber::EnvFilter;

pub const LOG_VAR: &str = "TWIG_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("off"));

    // a second initialization (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init();
}
