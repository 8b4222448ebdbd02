//! Incident counts over calendar-month windows.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use stats_core::models::{CrimeRecord, MonthKey, TrendFill};
use tracing::debug;

use crate::cleaner::CleanedDataset;

// ── MonthlyCount ──────────────────────────────────────────────────────────────

/// Number of incidents reported within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Bucket key, serialised as `"YYYY-MM"`.
    pub month: MonthKey,
    /// Last day of the month, the label a month-end resample would use.
    pub month_end: NaiveDate,
    pub count: usize,
}

impl MonthlyCount {
    fn new(month: MonthKey, count: usize) -> Self {
        Self {
            month,
            month_end: month.end_of_month(),
            count,
        }
    }
}

// ── TrendAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups dated records by month.
pub struct TrendAggregator;

impl TrendAggregator {
    /// Count dated records per month over the cleaned dataset.
    ///
    /// Records without a `reported_date` are skipped. The result is sorted
    /// by month ascending with no duplicate keys.
    pub fn aggregate_monthly(dataset: &CleanedDataset, fill: TrendFill) -> Vec<MonthlyCount> {
        let sparse = Self::aggregate_by_month(dataset.records());
        match fill {
            TrendFill::Sparse => sparse,
            TrendFill::Dense => Self::densify(&sparse),
        }
    }

    /// Sum of counts across all months.
    pub fn calculate_total(trend: &[MonthlyCount]) -> usize {
        trend.iter().map(|m| m.count).sum()
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn aggregate_by_month(records: &[CrimeRecord]) -> Vec<MonthlyCount> {
        let mut map: BTreeMap<MonthKey, usize> = BTreeMap::new();
        let mut undated = 0usize;

        for record in records {
            match record.reported_date {
                Some(date) => *map.entry(MonthKey::from_date(date)).or_default() += 1,
                None => undated += 1,
            }
        }

        debug!(
            "Monthly trend: {} months, {} records without date skipped",
            map.len(),
            undated
        );

        map.into_iter()
            .map(|(month, count)| MonthlyCount::new(month, count))
            .collect()
    }

    /// Insert zero-count entries for every missing month between the first
    /// and last observed month.
    fn densify(sparse: &[MonthlyCount]) -> Vec<MonthlyCount> {
        let (Some(first), Some(last)) = (sparse.first(), sparse.last()) else {
            return Vec::new();
        };

        let mut dense = Vec::new();
        let mut observed = sparse.iter().peekable();
        let mut month = first.month;
        while month <= last.month {
            let count = match observed.peek() {
                Some(entry) if entry.month == month => {
                    let count = entry.count;
                    observed.next();
                    count
                }
                _ => 0,
            };
            dense.push(MonthlyCount::new(month, count));
            month = month.next();
        }
        dense
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
