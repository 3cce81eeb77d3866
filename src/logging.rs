//! Logging setup for the imgrot binary.
//!
//! The viewer owns the terminal, so log output goes to a file. The filter
//! comes from `RUST_LOG` when set, otherwise from the configured level.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, appending to `log_file`.
///
/// Creates the parent directory if needed. Calling this twice is harmless:
/// the second subscriber is simply not installed.
pub fn init_logging(log_file: &Path, level: &str) -> io::Result<()> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .try_init();

    Ok(())
}

/// `RUST_LOG` if set and valid, else `level`, else `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
