//! Error types for Nephra Core

use thiserror::Error;

/// Errors that can occur at the input boundary.
///
/// The analysis functions themselves are total and never return these;
/// `CoreError` only appears when parsing, validating, or fetching
/// observations on behalf of a caller.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse observation: {0}")]
    ParseError(String),

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Observation history is empty")]
    EmptyHistory,

    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("All data sources failed after {attempts} attempts")]
    AllSourcesFailed { attempts: usize },
}
