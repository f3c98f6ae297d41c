//! Error types for nergen.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for nergen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for nergen operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A required input file or table is missing.
    #[error("Missing input: {0}")]
    InputMissing(PathBuf),

    /// A sampling request exceeded the available unique pool.
    #[error("Pool exhausted: requested {requested}, available {available}")]
    PoolExhausted {
        /// Number of items the caller asked for.
        requested: usize,
        /// Number of items the pool could still supply.
        available: usize,
    },

    /// Invalid configuration (ratios not summing to 1, bad thresholds, ...).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Input could not be parsed (bad label, malformed row, bad JSON cell).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Dataset-level problem (empty corpus, malformed document collection).
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Evaluation error.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }

    /// Create an evaluation error.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Error::Evaluation(msg.into())
    }

    /// Create a missing-input error for the given path.
    pub fn input_missing(path: impl Into<PathBuf>) -> Self {
        Error::InputMissing(path.into())
    }
}
