//! CSV discovery and loading of raw incident rows.
//!
//! A data path may point at a single CSV file or at a directory, which is
//! searched recursively for `*.csv` files.

use std::path::{Path, PathBuf};

use stats_core::error::{Result, StatsError};
use stats_core::models::RawRecord;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Rows loaded from one or more CSV files.
#[derive(Debug, Clone, Default)]
pub struct LoadedRows {
    pub rows: Vec<RawRecord>,
    pub files_read: usize,
    /// Rows the CSV decoder could not map onto [`RawRecord`].
    pub rows_skipped: usize,
}

/// Load every row from `data_path`.
///
/// A missing path or a directory without CSV files is an error; malformed
/// rows inside a file are skipped with a warning.
pub fn load_raw_records(data_path: &Path) -> Result<LoadedRows> {
    if !data_path.exists() {
        return Err(StatsError::DataPathNotFound(data_path.to_path_buf()));
    }

    let files = if data_path.is_dir() {
        let files = find_csv_files(data_path);
        if files.is_empty() {
            return Err(StatsError::NoDataFiles(data_path.to_path_buf()));
        }
        files
    } else {
        vec![data_path.to_path_buf()]
    };

    let mut loaded = LoadedRows::default();
    for file in &files {
        let file_handle = std::fs::File::open(file).map_err(|source| StatsError::FileRead {
            path: file.clone(),
            source,
        })?;
        let (rows, skipped) = read_csv(file_handle, file)?;
        loaded.rows.extend(rows);
        loaded.rows_skipped += skipped;
        loaded.files_read += 1;
    }

    debug!(
        "Loaded {} rows from {} files ({} skipped)",
        loaded.rows.len(),
        loaded.files_read,
        loaded.rows_skipped
    );

    Ok(loaded)
}

/// Parse CSV rows from any reader. `origin` is only used in messages.
pub fn read_csv(reader: impl std::io::Read, origin: &Path) -> Result<(Vec<RawRecord>, usize)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Surface an unreadable header as a fatal error rather than zero rows.
    csv_reader.headers().map_err(|source| StatsError::CsvParse {
        path: origin.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(
                    "Skipping malformed row {} in {}: {}",
                    line + 1,
                    origin.display(),
                    e
                );
                skipped += 1;
            }
        }
    }

    Ok((rows, skipped))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
