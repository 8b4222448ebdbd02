use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

// ── DateProcessor ─────────────────────────────────────────────────────────────

/// Parses reporting dates from the variety of formats found in incident exports.
pub struct DateProcessor;

impl DateProcessor {
    /// Attempt to parse a date-like string into a calendar date.
    ///
    /// Handles:
    /// * empty / whitespace → `None`
    /// * RFC 3339 (including `Z` suffix) → date part of the timestamp
    /// * common date and date-time patterns, ISO first, then day-first,
    ///   then month-first
    ///
    /// Anything else logs a warning and yields `None`; the caller keeps the
    /// record.
    pub fn parse(value: &str) -> Option<NaiveDate> {
        let s = value.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        // Month-first before day-first for ambiguous slash dates.
        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        warn!("DateProcessor: could not parse date string \"{}\"", s);
        None
    }
}

// ── TextNormalizer ────────────────────────────────────────────────────────────

/// Canonicalises free-text fields coming from raw rows.
pub struct TextNormalizer;

impl TextNormalizer {
    /// Trim `value`; `None` when absent or empty after trimming.
    pub fn present(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|s| !s.is_empty())
    }

    /// Trim and lower-case `value`; `None` when absent or empty.
    pub fn label(value: Option<&str>) -> Option<String> {
        Self::present(value).map(str::to_lowercase)
    }
}
