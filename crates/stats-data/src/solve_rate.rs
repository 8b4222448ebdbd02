//! Solve-rate comparison between records with and without a location.

use serde::Serialize;

use crate::cleaner::CleanedDataset;

/// Solved/total tally for one partition of the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    pub total: usize,
    pub solved: usize,
}

impl PartitionStats {
    /// Percentage of solved records, exactly `0.0` for an empty partition.
    pub fn solve_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.solved as f64 / self.total as f64) * 100.0
    }

    fn add(&mut self, solved: bool) {
        self.total += 1;
        if solved {
            self.solved += 1;
        }
    }
}

/// Both partitions produced by [`LocationSolveRateAnalyzer::analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SolveRateAnalysis {
    pub with_location: PartitionStats,
    pub without_location: PartitionStats,
}

impl SolveRateAnalysis {
    pub fn solve_rate_with_location(&self) -> f64 {
        self.with_location.solve_rate()
    }

    pub fn solve_rate_without_location(&self) -> f64 {
        self.without_location.solve_rate()
    }
}

/// Stateless single-pass partition of a [`CleanedDataset`] by location presence.
pub struct LocationSolveRateAnalyzer;

impl LocationSolveRateAnalyzer {
    pub fn analyze(dataset: &CleanedDataset) -> SolveRateAnalysis {
        let mut analysis = SolveRateAnalysis::default();
        for record in dataset.records() {
            let partition = if record.has_location {
                &mut analysis.with_location
            } else {
                &mut analysis.without_location
            };
            partition.add(record.is_solved());
        }
        analysis
    }
}
