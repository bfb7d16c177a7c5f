//! Tracing setup.
//!
//! The terminal belongs to the TUI, so all log output goes to a file.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Level used by `--verbose`.
pub const VERBOSE_LEVEL: &str = "debug";

/// Builds the filter: `RUST_LOG` wins, then `--verbose`, then the configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let level = if verbose {
        VERBOSE_LEVEL
    } else {
        config.level.as_str()
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber writing to `log_file`.
///
/// A second call is a no-op.
pub fn init(config: &LoggingConfig, log_file: &Path, verbose: bool) -> Result<()> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter(config, verbose))
        .with(file_layer)
        .try_init();

    tracing::info!(file = %log_file.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("logs").join("codesearch.log");
        init(&LoggingConfig::default(), &log_file, false).unwrap();
        assert!(log_file.exists());
    }
}
