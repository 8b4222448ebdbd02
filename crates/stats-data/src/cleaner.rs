//! Required-field cleaning of ingested records.

use stats_core::models::{CleaningPolicy, CrimeRecord};
use tracing::debug;

/// Records that passed a [`CleaningPolicy`], in input order.
///
/// Constructed only by [`Cleaner::clean`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    records: Vec<CrimeRecord>,
    policy: CleaningPolicy,
    loaded_count: usize,
}

impl CleanedDataset {
    pub fn records(&self) -> &[CrimeRecord] {
        &self.records
    }

    pub fn policy(&self) -> CleaningPolicy {
        self.policy
    }

    /// Number of records handed to the cleaner.
    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    /// Number of records that survived. Never exceeds [`Self::loaded_count`].
    pub fn cleaned_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stateless filter applying a [`CleaningPolicy`].
pub struct Cleaner;

impl Cleaner {
    /// Drop every record missing a field `policy` mandates.
    pub fn clean(records: Vec<CrimeRecord>, policy: CleaningPolicy) -> CleanedDataset {
        let loaded_count = records.len();
        let records: Vec<CrimeRecord> = records
            .into_iter()
            .filter(|r| policy.accepts(r))
            .collect();

        debug!(
            "Cleaning with {}: {} loaded, {} kept, {} dropped",
            policy,
            loaded_count,
            records.len(),
            loaded_count - records.len()
        );

        CleanedDataset {
            records,
            policy,
            loaded_count,
        }
    }
}
