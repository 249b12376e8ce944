//! Error taxonomy for registry construction and table loading.
//!
//! Every failure is fatal to the call that raised it: there is no partial
//! table and no retry. Soft conditions (an unknown raw column, an unknown
//! categorical value) are not errors and never reach this module.

use thiserror::Error;

/// A column table that cannot be turned into a registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Duplicate raw column name '{name}' at positions {first} and {second}")]
    DuplicateRawName {
        name: String,
        first: usize,
        second: usize,
    },
    #[error("Duplicate normalized id '{id}' at positions {first} and {second}")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },
}

/// Why a single cell failed its column's parse rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CellError(String);

impl CellError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Column '{column}' has {actual} value(s) but the table has {expected} row(s)")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No readable source found for {requested}")]
    SourceNotFound { requested: String },
    #[error("Column '{column}' row {row}: cannot parse '{raw}' ({reason})")]
    Parse {
        column: String,
        row: usize,
        raw: String,
        reason: String,
    },
    #[error("Unknown encoding '{0}'")]
    Encoding(String),
    #[error("Failed to decode {context} with encoding {encoding}")]
    Decode {
        context: String,
        encoding: &'static str,
    },
    #[error("Duplicate key '{key}' in column '{column}'")]
    DuplicateKey { column: String, key: String },
    #[error("Row {row} has no value in key column '{column}'")]
    MissingKey { column: String, row: usize },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;
