//! Error type for `storepulse-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] storepulse_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The sales table has never been loaded into this database.
  #[error("table {0} does not exist; run a load first")]
  MissingTable(&'static str),

  #[error("table {0} was not created by the load")]
  TableNotCreated(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
