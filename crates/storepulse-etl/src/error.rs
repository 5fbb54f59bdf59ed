//! Error types for the storepulse-etl loader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required columns: {0:?}")]
  MissingColumns(Vec<String>),

  #[error("line {line}: store number {value:?} is not an integer")]
  NonIntegerStoreNumber { line: u64, value: String },

  #[error("line {line}: store number {value} is not positive")]
  NonPositiveStoreNumber { line: u64, value: i64 },

  #[error("line {line}: invalid number in {column}: {value:?}")]
  InvalidNumber { line: u64, column: &'static str, value: String },

  #[error("line {line}: invalid flag in {column}: {value:?}")]
  InvalidFlag { line: u64, column: &'static str, value: String },

  #[error("failed to open {path}: {source}")]
  Open {
    path:   String,
    #[source]
    source: std::io::Error,
  },

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
