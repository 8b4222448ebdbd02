use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File looked up in the working directory when no data path is given.
pub const DEFAULT_DATA_FILE: &str = "crime_data.csv";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI log-level name onto a `tracing` filter directive.
///
/// Unrecognised names are passed through lower-cased.
pub fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr so that stdout carries only the report.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Resolve the data source: the explicit path when given, otherwise
/// [`DEFAULT_DATA_FILE`] inside `working_dir`.
///
/// The returned path is not checked for existence; the loader reports a
/// missing source.
pub fn discover_data_path(explicit: Option<&Path>, working_dir: &Path) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => working_dir.join(DEFAULT_DATA_FILE),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
