//! Error types for cleaning operations.

use polars::prelude::PolarsError;

/// Result type for cleaning operations
pub type CleaningResult<T> = Result<T, CleaningError>;

/// Error type for cleaning operations
#[derive(Debug, thiserror::Error)]
pub enum CleaningError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("{orphaned} funding rounds reference companies that do not exist")]
    OrphanedRounds { orphaned: usize },

    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),
}

impl CleaningError {
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        CleaningError::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}
