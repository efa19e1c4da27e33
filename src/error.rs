//! Error types for evoarm
//!
//! This module defines all error types used throughout the library.
//! Configuration errors are raised eagerly, before any search budget is
//! spent; conditions the decoder and the metrics run into mid-search are
//! handled in place rather than surfaced as errors.

use thiserror::Error;

/// Error type for dataset loading and export
#[derive(Debug, Error)]
pub enum DatasetError {
    /// IO error reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input or output
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input contains no data rows
    #[error("Empty table: no transactions in input")]
    EmptyTable,

    /// A row's field count differs from the header
    #[error("Ragged row {row}: expected {expected} fields, got {actual}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Columns of differing lengths passed to a transaction table
    #[error("Column length mismatch: expected {expected} rows, got {actual}")]
    ColumnLengths { expected: usize, actual: usize },
}

/// Top-level error type for mining configuration and runs
#[derive(Debug, Error)]
pub enum MiningError {
    /// The metric set for the fitness function is empty
    #[error("No metrics selected for the fitness function")]
    EmptyMetrics,

    /// A metric name is not in the available-metrics enumeration
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Metrics and weights differ in length
    #[error("Mismatched lengths: {metrics} metrics, {weights} weights")]
    WeightCountMismatch { metrics: usize, weights: usize },

    /// A metric weight is zero or negative
    #[error("Nonpositive weight {weight} for metric {metric}")]
    NonpositiveWeight { metric: &'static str, weight: f64 },

    /// Unrecognized algorithm name
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Neither an evaluation nor an iteration budget was set
    #[error("Missing stopping budget: set max evaluations and/or max iterations")]
    MissingBudget,

    /// Algorithm parameters were rejected
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Dataset error
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// Result type alias for mining operations
pub type MiningResult<T> = Result<T, MiningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_error_display() {
        let err = DatasetError::EmptyTable;
        assert_eq!(err.to_string(), "Empty table: no transactions in input");

        let err = DatasetError::RaggedRow {
            row: 3,
            expected: 4,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Ragged row 3: expected 4 fields, got 2");
    }

    #[test]
    fn test_mining_error_display() {
        let err = MiningError::UnknownMetric("suport".to_string());
        assert_eq!(err.to_string(), "Unknown metric: suport");

        let err = MiningError::WeightCountMismatch {
            metrics: 3,
            weights: 2,
        };
        assert_eq!(err.to_string(), "Mismatched lengths: 3 metrics, 2 weights");

        let err = MiningError::NonpositiveWeight {
            metric: "support",
            weight: -1.0,
        };
        assert_eq!(err.to_string(), "Nonpositive weight -1 for metric support");
    }

    #[test]
    fn test_mining_error_from_dataset_error() {
        let err: MiningError = DatasetError::EmptyTable.into();
        assert!(matches!(err, MiningError::Dataset(_)));
    }
}
