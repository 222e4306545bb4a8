//! Subscriber setup for the command-line entry point.
//!
//! Library code only emits `tracing` events under `cxxpm::*` targets; the
//! binary decides where they go.

use tracing::Level;

/// Target used for run-level events emitted by the binary.
pub const LOG_TARGET: &str = "cxxpm::run";

/// Maps the number of `-v` flags to a maximum level.
#[must_use]
pub const fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a compact stderr subscriber.
///
/// A subscriber that is already installed is kept; the failure is reported at
/// debug level through it.
pub fn init_tracing(verbosity: u8) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(level_for_verbosity(verbosity))
        .with_target(verbosity > 0)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(err) = installed {
        tracing::debug!(target: LOG_TARGET, "tracing subscriber already installed: {err}");
    }
}
