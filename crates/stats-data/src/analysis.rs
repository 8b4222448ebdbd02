//! Main analysis pipeline.
//!
//! Ingests raw rows, cleans them under a [`CleaningPolicy`], runs every
//! analyzer over the cleaned dataset and composes a [`SummaryReport`].

use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use stats_core::error::Result;
use stats_core::models::{CleaningPolicy, FrequencyMode, RawRecord, TrendFill};
use tracing::{debug, info, warn};

use crate::aggregator::{MonthlyCount, TrendAggregator};
use crate::cleaner::{CleanedDataset, Cleaner};
use crate::distribution::{CategoryCount, CategoryDistribution};
use crate::frequency::{FrequencyAnalysis, FrequencyAnalyzer, PlacedCrime};
use crate::ingest::RecordIngestor;
use crate::reader::load_raw_records;
use crate::solve_rate::{LocationSolveRateAnalyzer, SolveRateAnalysis};

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub policy: CleaningPolicy,
    pub trend_fill: TrendFill,
    /// Number of areas kept in [`SummaryReport::area_counts`].
    pub top_areas: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            policy: CleaningPolicy::RequireOutcome,
            trend_fill: TrendFill::Sparse,
            top_areas: 10,
        }
    }
}

/// Everything derived from one cleaned dataset.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub loaded_count: usize,
    pub cleaned_count: usize,
    pub policy: CleaningPolicy,
    pub frequency_mode: FrequencyMode,
    /// Tied most-frequent crime types, in first-appearance order.
    pub most_frequent_crimes: Vec<String>,
    pub frequency_of_most: usize,
    /// Each occurrence of a most-frequent crime with its place, if known.
    pub most_frequent_incidents: Vec<PlacedCrime>,
    /// Known places of the most-frequent crimes; records without a
    /// location contribute nothing.
    pub places_for_most_frequent: Vec<String>,
    pub repeated_places: Vec<String>,
    pub solve_rate_with_location: f64,
    pub solve_rate_without_location: f64,
    pub monthly_trend: Vec<MonthlyCount>,
    /// Every crime type with its count, largest first.
    pub crime_type_counts: Vec<CategoryCount>,
    pub outcome_counts: Vec<CategoryCount>,
    pub severity_counts: Vec<CategoryCount>,
    /// The most frequent areas, truncated to `top_areas`.
    pub area_counts: Vec<CategoryCount>,
}

impl SummaryReport {
    /// The two solve rates as labelled bars.
    pub fn solve_rate_comparison(&self) -> [(&'static str, f64); 2] {
        [
            ("With Location", self.solve_rate_with_location),
            ("Without Location", self.solve_rate_without_location),
        ]
    }

    /// Number of records dropped during cleaning.
    pub fn dropped_count(&self) -> usize {
        self.loaded_count - self.cleaned_count
    }
}

// ── SummaryReportBuilder ──────────────────────────────────────────────────────

/// Pure composition of analyzer outputs into a [`SummaryReport`].
pub struct SummaryReportBuilder;

impl SummaryReportBuilder {
    /// Run every analyzer over `dataset` and assemble the report.
    pub fn build(dataset: &CleanedDataset, options: &AnalysisOptions) -> SummaryReport {
        let frequency = FrequencyAnalyzer::analyze(dataset);
        let solve_rates = LocationSolveRateAnalyzer::analyze(dataset);
        let trend = TrendAggregator::aggregate_monthly(dataset, options.trend_fill);
        debug!(
            "Trend spans {} months covering {} dated records",
            trend.len(),
            TrendAggregator::calculate_total(&trend)
        );
        Self::compose(dataset, frequency, solve_rates, trend, options)
    }

    /// Assemble a report from analyzer outputs computed elsewhere.
    pub fn compose(
        dataset: &CleanedDataset,
        frequency: FrequencyAnalysis,
        solve_rates: SolveRateAnalysis,
        monthly_trend: Vec<MonthlyCount>,
        options: &AnalysisOptions,
    ) -> SummaryReport {
        let records = dataset.records();

        SummaryReport {
            loaded_count: dataset.loaded_count(),
            cleaned_count: dataset.cleaned_count(),
            policy: dataset.policy(),
            frequency_mode: frequency.mode,
            most_frequent_crimes: frequency.most_frequent_crimes,
            frequency_of_most: frequency.frequency_of_most,
            most_frequent_incidents: frequency.incidents,
            places_for_most_frequent: frequency.places_for_most_frequent,
            repeated_places: frequency.repeated_places,
            solve_rate_with_location: solve_rates.solve_rate_with_location(),
            solve_rate_without_location: solve_rates.solve_rate_without_location(),
            monthly_trend,
            crime_type_counts: CategoryDistribution::count_by(records, |r| r.known_crime_type()),
            outcome_counts: CategoryDistribution::count_by(records, |r| r.outcome.as_deref()),
            severity_counts: CategoryDistribution::count_by(records, |r| r.severity.as_deref()),
            area_counts: CategoryDistribution::top_by(
                records,
                |r| r.known_place(),
                options.top_areas,
            ),
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Metadata produced alongside a report loaded from disk.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub files_read: usize,
    pub rows_skipped: usize,
    pub load_time_seconds: f64,
    pub analysis_time_seconds: f64,
}

/// The complete output of [`analyze_path`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub report: SummaryReport,
    pub metadata: AnalysisMetadata,
}

/// Ingest, clean and analyse in-memory rows.
pub fn analyze_records(rows: &[RawRecord], options: &AnalysisOptions) -> SummaryReport {
    let records = RecordIngestor::ingest_all(rows);
    let dataset = Cleaner::clean(records, options.policy);
    if dataset.is_empty() && !rows.is_empty() {
        warn!("No records left after cleaning under {}", options.policy);
    }
    SummaryReportBuilder::build(&dataset, options)
}

/// Run the full pipeline over a CSV file or directory.
///
/// 1. Load raw rows from `data_path`.
/// 2. Ingest and clean them under `options.policy`.
/// 3. Run the analyzers and build the report.
pub fn analyze_path(data_path: &Path, options: &AnalysisOptions) -> Result<AnalysisResult> {
    let load_start = std::time::Instant::now();
    let loaded = load_raw_records(data_path)?;
    let load_time = load_start.elapsed().as_secs_f64();
    if loaded.rows_skipped > 0 {
        warn!(
            "{} malformed rows skipped; they are not part of the loaded count",
            loaded.rows_skipped
        );
    }

    let analysis_start = std::time::Instant::now();
    let report = analyze_records(&loaded.rows, options);
    let analysis_time = analysis_start.elapsed().as_secs_f64();

    info!(
        "Analysed {}: {} loaded, {} after cleaning ({})",
        data_path.display(),
        report.loaded_count,
        report.cleaned_count,
        report.policy
    );

    Ok(AnalysisResult {
        report,
        metadata: AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            files_read: loaded.files_read,
            rows_skipped: loaded.rows_skipped,
            load_time_seconds: load_time,
            analysis_time_seconds: analysis_time,
        },
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
