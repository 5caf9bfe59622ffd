//! Structured logging to a file, since the terminal belongs to the TUI.
//!
//! The filter comes from `SPYGLASS_LOG` when set, then the configured level, then `warn`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable overriding the configured log filter.
pub const LOG_ENV: &str = "SPYGLASS_LOG";

/// Builds the filter from the environment, then `level`, then `warn`.
#[must_use]
pub fn filter(level: &str) -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Installs a subscriber appending to `log_file`. Without a file nothing is installed.
///
/// Returns whether logging was enabled.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber is already set.
pub fn init(level: &str, log_file: Option<&Path>) -> io::Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(filter(level))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(true)
}

#[cfg(test)]
#[path = "tests/logging.rs"]
mod tests;
