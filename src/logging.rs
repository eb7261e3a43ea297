//! Tracing setup for binaries built on the crate.
//!
//! Output goes to a file, never to stdout or stderr. The embedding
//! application owns the terminal, and the demo prints its results there.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "ANYSTATE_LOG";

/// Initialize tracing with optional file output.
///
/// Logging is disabled unless `ANYSTATE_LOG` names a file path, so a library
/// user who never sets it gets no subscriber from this crate. Log files
/// get unique names so concurrent processes never share one:
/// `{path}.{timestamp}.{pid}`. The filter comes from `RUST_LOG`,
/// defaulting to `info`.
pub fn init_tracing() {
    let Some(log_path) = std::env::var(LOG_ENV).ok() else {
        return;
    };

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // A subscriber may already be installed (tests, embedding apps).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}
