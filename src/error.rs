use thiserror::Error;

use crate::processing::Operation;

/// Convenience result type for column/operation validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Convenience result type for record and configuration loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error type returned while validating a column/operation request.
///
/// Every variant is a configuration error: it is raised before any group is evaluated, and no
/// partial spec is ever returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The column list or the operation list was empty.
    #[error("there must be at least one column and at least one operation named")]
    MissingSpec,

    /// Both lists have more than one entry, but their lengths differ.
    #[error(
        "there are {columns} columns given, but there are {operations} operations; provide either \
         a single operation for all columns, a single column for all operations, or an operation \
         for each column"
    )]
    CountMismatch { columns: usize, operations: usize },

    /// Column operations are not supported for this record kind.
    #[error("{kind} database files are not currently supported for column operations")]
    UnsupportedRecordKind { kind: String },

    /// A column token is not a positive integer.
    #[error("invalid column '{token}': expected a positive integer")]
    InvalidColumn { token: String },

    /// The column is outside `1..=field_count` for the record kind.
    #[error("requested column {column}, but the database file only has fields 1 - {field_count}")]
    ColumnOutOfRange { column: usize, field_count: usize },

    /// The operation name is not in the catalog.
    #[error("{token} is not a valid operation")]
    UnknownOperation { token: String },

    /// A numeric operation was requested on a column the record kind does not guarantee numeric.
    #[error("column {column} is not a numeric field for the database file (operation '{operation}')")]
    NonNumericColumn { column: usize, operation: Operation },
}

/// Error type returned when loading records or configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tab-delimited reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON configuration could not be decoded.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The record format could not be determined from the path.
    #[error("unknown record format: {message}")]
    UnknownFormat { message: String },

    /// A record line does not have the shape its format requires.
    #[error("malformed record at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl LoadError {
    /// Input line the error points at, when the reader knows it.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } => Some(*line),
            Self::Csv(err) => err.position().map(|pos| pos.line() as usize),
            _ => None,
        }
    }
}
