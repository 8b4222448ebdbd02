//! Crime-type frequency, tie resolution and place cross-referencing.

use std::collections::HashMap;

use serde::Serialize;
use stats_core::models::{CrimeRecord, FrequencyMode};

use crate::cleaner::CleanedDataset;

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Occurrence count per crime type, iterable in first-appearance order.
///
/// Records without a crime type are not counted.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Count known crime types over `records`.
    pub fn from_records(records: &[CrimeRecord]) -> Self {
        let mut table = Self::default();
        for crime in records.iter().filter_map(CrimeRecord::known_crime_type) {
            match table.counts.get_mut(crime) {
                Some(count) => *count += 1,
                None => {
                    table.order.push(crime.to_string());
                    table.counts.insert(crime.to_string(), 1);
                }
            }
        }
        table
    }

    /// Highest count in the table, 0 when empty.
    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// `(crime_type, count)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(move |crime| (crime.as_str(), self.counts[crime]))
    }
}

// ── FrequencyAnalysis ─────────────────────────────────────────────────────────

/// One occurrence of a most-frequent crime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedCrime {
    pub crime_type: String,
    /// `None` when the record carried no location.
    pub place: Option<String>,
}

/// Result of [`FrequencyAnalyzer::analyze`].
#[derive(Debug, Clone)]
pub struct FrequencyAnalysis {
    pub table: FrequencyTable,
    pub mode: FrequencyMode,
    /// Crime types sharing the maximum count, in first-appearance order.
    pub most_frequent_crimes: Vec<String>,
    pub frequency_of_most: usize,
    /// Every occurrence of a most-frequent crime, grouped by crime then
    /// record order.
    pub incidents: Vec<PlacedCrime>,
    /// Known places of `incidents`, in the same order. Duplicates are kept.
    pub places_for_most_frequent: Vec<String>,
    /// Places appearing more than once in `places_for_most_frequent`, in
    /// first-occurrence order. Empty unless `mode` is `Repeated`.
    pub repeated_places: Vec<String>,
}

// ── FrequencyAnalyzer ─────────────────────────────────────────────────────────

/// Stateless frequency analysis over a [`CleanedDataset`].
pub struct FrequencyAnalyzer;

impl FrequencyAnalyzer {
    pub fn analyze(dataset: &CleanedDataset) -> FrequencyAnalysis {
        let records = dataset.records();
        let table = FrequencyTable::from_records(records);
        let max_count = table.max_count();
        let mode = FrequencyMode::from_max_count(max_count);

        let most_frequent_crimes: Vec<String> = table
            .iter()
            .filter(|&(_, count)| count == max_count && max_count > 0)
            .map(|(crime, _)| crime.to_string())
            .collect();

        let incidents: Vec<PlacedCrime> = most_frequent_crimes
            .iter()
            .flat_map(move |crime| {
                records
                    .iter()
                    .filter(move |r| r.known_crime_type() == Some(crime.as_str()))
                    .map(move |r| PlacedCrime {
                        crime_type: crime.clone(),
                        place: r.known_place().map(str::to_string),
                    })
            })
            .collect();

        let places_for_most_frequent: Vec<String> = incidents
            .iter()
            .filter_map(|incident| incident.place.clone())
            .collect();

        let repeated_places = match mode {
            FrequencyMode::Repeated => Self::repeated(&places_for_most_frequent),
            FrequencyMode::Empty | FrequencyMode::NoRepetition => Vec::new(),
        };

        FrequencyAnalysis {
            table,
            mode,
            most_frequent_crimes,
            frequency_of_most: max_count,
            incidents,
            places_for_most_frequent,
            repeated_places,
        }
    }

    /// Values occurring more than once, each listed once at its first position.
    fn repeated(places: &[String]) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for place in places {
            *counts.entry(place.as_str()).or_default() += 1;
        }

        let mut result: Vec<String> = Vec::new();
        for place in places {
            if counts[place.as_str()] > 1 && !result.contains(place) {
                result.push(place.clone());
            }
        }
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
