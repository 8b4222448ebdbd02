//! Ingestion and analysis layer for crime statistics.
//!
//! Reads incident rows from CSV, normalises and cleans them, and runs the
//! frequency, solve-rate, trend and distribution analyzers that feed the
//! [`analysis::SummaryReport`].

pub mod aggregator;
pub mod analysis;
pub mod cleaner;
pub mod distribution;
pub mod frequency;
pub mod ingest;
pub mod reader;
pub mod solve_rate;
