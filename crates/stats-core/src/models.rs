use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

/// Placeholder stored for a crime type or place that was absent in the source.
pub const UNKNOWN_LABEL: &str = "unknown";

/// One incident row exactly as it arrives from a data source.
///
/// Every field is optional; an empty cell and a missing column are treated
/// the same way by the ingestor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Free-text crime category, any casing.
    #[serde(default)]
    pub crime_type: Option<String>,
    /// Location of the incident. CSV files call this column `area` or `place`.
    #[serde(default, alias = "place")]
    pub area: Option<String>,
    /// Case outcome text, e.g. `"Solved"` or `"Under investigation"`.
    #[serde(default)]
    pub outcome: Option<String>,
    /// Date-like string for when the incident was reported.
    #[serde(default)]
    pub reported_date: Option<String>,
    /// Severity label. Passed through to category counts only.
    #[serde(default)]
    pub severity: Option<String>,
}

/// A normalised incident record produced by the ingestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// Lower-cased, trimmed crime type; [`UNKNOWN_LABEL`] when absent.
    pub crime_type: String,
    /// `true` iff the source crime type was present and non-empty.
    pub has_crime_type: bool,
    /// Lower-cased, trimmed place; [`UNKNOWN_LABEL`] when absent.
    pub place: String,
    /// Trimmed outcome text, original casing.
    pub outcome: Option<String>,
    /// `true` iff the source location field was present and non-empty.
    pub has_location: bool,
    /// Reporting date, `None` when absent or unparsable.
    pub reported_date: Option<NaiveDate>,
    /// Trimmed severity label, original casing.
    pub severity: Option<String>,
}

impl CrimeRecord {
    /// The crime type, `None` when it is only the placeholder.
    pub fn known_crime_type(&self) -> Option<&str> {
        self.has_crime_type.then_some(self.crime_type.as_str())
    }

    /// The place, `None` when it is only the placeholder.
    pub fn known_place(&self) -> Option<&str> {
        self.has_location.then_some(self.place.as_str())
    }

    /// Whether the outcome text marks the case as solved.
    ///
    /// Matching is a case-insensitive substring search for `"solved"`, so
    /// `"Solved"`, `"SOLVED - charged"` and `"unsolved"` all match. A missing
    /// outcome is never solved.
    pub fn is_solved(&self) -> bool {
        self.outcome
            .as_deref()
            .map(|o| o.to_lowercase().contains("solved"))
            .unwrap_or(false)
    }
}

/// Which fields must be present for a record to survive cleaning.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningPolicy {
    /// Drop records without an outcome (dashboard tool).
    #[default]
    RequireOutcome,
    /// Drop records without an outcome or without a location (simple CSV tool).
    RequireOutcomeAndLocation,
    /// Keep every record (console entry tool, which has no outcome column).
    KeepAll,
}

impl CleaningPolicy {
    /// Returns `true` when `record` carries every field this policy mandates.
    pub fn accepts(self, record: &CrimeRecord) -> bool {
        match self {
            Self::RequireOutcome => record.outcome.is_some(),
            Self::RequireOutcomeAndLocation => record.outcome.is_some() && record.has_location,
            Self::KeepAll => true,
        }
    }
}

impl fmt::Display for CleaningPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequireOutcome => "require-outcome",
            Self::RequireOutcomeAndLocation => "require-outcome-and-location",
            Self::KeepAll => "keep-all",
        };
        f.write_str(name)
    }
}

/// Whether the monthly trend reports only observed months or every month
/// in the observed range.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TrendFill {
    /// Only months with at least one incident.
    #[default]
    Sparse,
    /// Every month between the first and last observed month, zero-filled.
    Dense,
}

/// How consumers should present the most-frequent-crime section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyMode {
    /// No records survived cleaning.
    Empty,
    /// Every crime type occurs exactly once; all incidents carry equal weight.
    NoRepetition,
    /// At least one crime type occurs more than once.
    Repeated,
}

impl FrequencyMode {
    /// Select the mode for the given maximum occurrence count.
    pub fn from_max_count(max_count: usize) -> Self {
        match max_count {
            0 => Self::Empty,
            1 => Self::NoRepetition,
            _ => Self::Repeated,
        }
    }
}

/// A calendar month used as a trend bucket.
///
/// Ordering is chronological. Displays and serialises as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Build a key from a year and a 1-based month, `None` if `month` is out
    /// of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Last day of the month, the date a month-end resample labels the bucket with.
    pub fn end_of_month(&self) -> NaiveDate {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
