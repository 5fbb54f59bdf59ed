//! Error types for `storepulse-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid store number: {0}")]
  InvalidStoreNumber(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
