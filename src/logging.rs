//! Logging and tracing setup.
//!
//! `RUST_LOG` always wins; otherwise the level comes from the `-v` count.
//! Logs go to stderr so stdout stays clean for reports and JSON.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a given `-v` count when `RUST_LOG` is unset.
///
/// `None` disables logging entirely (used by the TUI, which owns the screen).
pub fn default_directive(verbosity: u8, quiet: bool) -> Option<&'static str> {
    match (quiet, verbosity) {
        (true, 0) => None,
        (false, 0) => Some("warn"),
        (_, 1) => Some("info"),
        (_, 2) => Some("debug"),
        _ => Some("trace"),
    }
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match default_directive(verbosity, quiet) {
            Some(directive) => EnvFilter::new(directive),
            None => return,
        },
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
