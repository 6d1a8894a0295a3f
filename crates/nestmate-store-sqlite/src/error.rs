//! Error type for `nestmate-store-sqlite`.

use nestmate_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown match status: {0:?}")]
  UnknownStatus(String),
}

impl StoreError for Error {
  fn is_duplicate(&self) -> bool {
    let Error::Database(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(failure, _),
    )) = self
    else {
      return false;
    };
    failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
      || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
