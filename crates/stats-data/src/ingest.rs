//! Normalisation of raw incident rows into [`CrimeRecord`]s.

use stats_core::data_processors::{DateProcessor, TextNormalizer};
use stats_core::models::{CrimeRecord, RawRecord, UNKNOWN_LABEL};
use tracing::debug;

/// Stateless converter from [`RawRecord`] to [`CrimeRecord`].
///
/// Never rejects a row: missing labels become [`UNKNOWN_LABEL`], an
/// unparsable date becomes `None`. Dropping incomplete records is the
/// cleaner's job.
pub struct RecordIngestor;

impl RecordIngestor {
    /// Normalise a single row.
    pub fn ingest(raw: &RawRecord) -> CrimeRecord {
        let crime_type = TextNormalizer::label(raw.crime_type.as_deref());
        let place = TextNormalizer::label(raw.area.as_deref());
        let has_location = place.is_some();

        CrimeRecord {
            has_crime_type: crime_type.is_some(),
            crime_type: crime_type.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            place: place.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            outcome: TextNormalizer::present(raw.outcome.as_deref()).map(str::to_string),
            has_location,
            reported_date: TextNormalizer::present(raw.reported_date.as_deref())
                .and_then(DateProcessor::parse),
            severity: TextNormalizer::present(raw.severity.as_deref()).map(str::to_string),
        }
    }

    /// Normalise every row, preserving input order.
    pub fn ingest_all(rows: &[RawRecord]) -> Vec<CrimeRecord> {
        let records: Vec<CrimeRecord> = rows.iter().map(Self::ingest).collect();
        let undated = records.iter().filter(|r| r.reported_date.is_none()).count();
        debug!("Ingested {} records ({} without a usable date)", records.len(), undated);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(
        crime_type: Option<&str>,
        area: Option<&str>,
        outcome: Option<&str>,
        date: Option<&str>,
    ) -> RawRecord {
        RawRecord {
            crime_type: crime_type.map(str::to_string),
            area: area.map(str::to_string),
            outcome: outcome.map(str::to_string),
            reported_date: date.map(str::to_string),
            severity: None,
        }
    }

    #[test]
    fn test_ingest_lowercases_and_trims_labels() {
        let record = RecordIngestor::ingest(&raw(Some("  THEFT "), Some("Market Street"), None, None));
        assert_eq!(record.crime_type, "theft");
        assert_eq!(record.place, "market street");
        assert!(record.has_location);
        assert!(record.has_crime_type);
    }

    #[test]
    fn test_ingest_missing_location() {
        let record = RecordIngestor::ingest(&raw(Some("Theft"), None, Some("Solved"), None));
        assert!(!record.has_location);
        assert_eq!(record.place, UNKNOWN_LABEL);

        let blank = RecordIngestor::ingest(&raw(Some("Theft"), Some("   "), Some("Solved"), None));
        assert!(!blank.has_location);
    }

    #[test]
    fn test_ingest_missing_crime_type_uses_placeholder() {
        let record = RecordIngestor::ingest(&raw(None, Some("Dock"), None, None));
        assert_eq!(record.crime_type, UNKNOWN_LABEL);
        assert!(!record.has_crime_type);
        assert!(record.known_crime_type().is_none());
        assert_eq!(record.known_place(), Some("dock"));
    }

    #[test]
    fn test_ingest_keeps_outcome_casing() {
        let record = RecordIngestor::ingest(&raw(Some("theft"), None, Some(" Under Investigation "), None));
        assert_eq!(record.outcome.as_deref(), Some("Under Investigation"));

        let empty = RecordIngestor::ingest(&raw(Some("theft"), None, Some(""), None));
        assert!(empty.outcome.is_none());
    }

    #[test]
    fn test_ingest_parses_date() {
        let record = RecordIngestor::ingest(&raw(Some("theft"), None, None, Some("2024-02-10")));
        assert_eq!(record.reported_date, NaiveDate::from_ymd_opt(2024, 2, 10));
    }

    #[test]
    fn test_ingest_bad_date_keeps_record() {
        let record = RecordIngestor::ingest(&raw(Some("theft"), Some("X"), Some("Open"), Some("yesterday")));
        assert!(record.reported_date.is_none());
        assert_eq!(record.crime_type, "theft");
    }

    #[test]
    fn test_ingest_severity_passthrough() {
        let mut row = raw(Some("assault"), None, None, None);
        row.severity = Some(" High ".to_string());
        assert_eq!(RecordIngestor::ingest(&row).severity.as_deref(), Some("High"));
    }

    #[test]
    fn test_ingest_all_preserves_order() {
        let rows = vec![
            raw(Some("b"), None, None, None),
            raw(Some("a"), None, None, None),
            raw(Some("c"), None, None, None),
        ];
        let types: Vec<String> = RecordIngestor::ingest_all(&rows)
            .into_iter()
            .map(|r| r.crime_type)
            .collect();
        assert_eq!(types, vec!["b", "a", "c"]);
    }
}
