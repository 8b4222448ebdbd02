//! Shared types for the crime statistics workspace.
//!
//! Holds the record and report models, the error type, date and text
//! normalisation helpers, display formatting and CLI settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
