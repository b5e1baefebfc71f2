//! Error taxonomy for the pairwise EMD pipeline.
//!
//! Every failure surfaces to the top-level call: one failing pair fails the
//! whole run, so there is no partial result table.

use thiserror::Error;

/// Errors raised while computing pairwise donor distances.
#[derive(Debug, Error)]
pub enum EmdError {
    #[error("Label column not found: {0}")]
    ColumnNotFound(String),

    #[error("Embedding not found: {0}")]
    BasisNotFound(String),

    #[error("Invalid component selection: requested {requested}, embedding has {available}")]
    InvalidComponents { requested: usize, available: usize },

    #[error("p-values are undefined without permutation draws")]
    DegenerateStatistic,

    #[error("Donor {donor} has no observations")]
    EmptyGroup { donor: String },

    #[error("Non-finite coordinate for donor {donor} in component {component}")]
    NonFiniteValue { donor: String, component: usize },

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, EmdError>;
