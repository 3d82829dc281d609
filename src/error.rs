//! Shared error type for dataset ingestion and encoding.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while reading, batching, or encoding a dataset.
///
/// Errors are raised synchronously at the point of detection and never
/// retried or suppressed internally. A chunk containing any invalid row
/// fails as a whole instead of dropping the bad row.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Underlying I/O failure while reading a data file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A token in a data file did not parse as a number.
    #[error("line {line}: invalid numeric value {token:?}")]
    InvalidToken { line: usize, token: String },

    /// A data file line produced a different column count than the first line.
    #[error("line {line}: expected {expected} columns, got {got}")]
    ColumnMismatch {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// An in-memory row list was ragged.
    #[error("row {row}: expected {expected} columns, got {got}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A data file contained no data rows.
    #[error("{}: file contains no data rows", .path.display())]
    EmptyFile { path: PathBuf },

    /// Batch size was zero.
    #[error("batch size must be positive")]
    InvalidBatchSize,

    /// A label was not present in the class dictionary.
    #[error("label {0} not present in class dictionary")]
    UnknownLabel(String),

    /// A class dictionary was built from no entries.
    #[error("class dictionary has no entries")]
    EmptyDictionary,

    /// The same label appeared twice while assembling a class dictionary.
    #[error("duplicate label {0} in class dictionary")]
    DuplicateLabel(String),

    /// A hand-built code had a different length than the others.
    #[error("code for label {label} has length {got}, expected {expected}")]
    CodeLengthMismatch {
        label: String,
        expected: usize,
        got: usize,
    },

    /// A hand-built code was not a one-hot vector.
    #[error("code for label {0} is not one-hot")]
    CodeNotOneHot(String),

    /// Two labels mapped to the same one-hot position.
    #[error("labels {0} and {1} share the same code position")]
    DuplicateCode(String, String),

    /// A matrix passed to decode had the wrong width.
    #[error("decode input has {got} columns, dictionary codes have {expected}")]
    CodeWidthMismatch { expected: usize, got: usize },
}
