//! Loading errors.
//!
//! `#[from]` conversions let `?` lift I/O and CSV reader errors straight
//! into `DataLoadError`.

use thiserror::Error;

/// Errors that can occur while loading and parsing the MovieLens CSV files
///
/// Every variant here is fatal for a batch run: the job aborts on the
/// first one it sees.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The input path doesn't exist
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader itself failed (bad quoting, invalid UTF-8, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row doesn't fit the declared column schema
    ///
    /// Raised when a row has fewer columns than the schema requires or a
    /// field can't be converted to its declared type.
    #[error("Schema mismatch at line {line} in {file}: {reason}")]
    SchemaMismatch {
        file: String,
        line: u64,
        reason: String,
    },
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, DataLoadError>;
