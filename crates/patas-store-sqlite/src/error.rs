//! Error type for `patas-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A patch or stored document whose JSON form is not an object.
  #[error("invalid document shape: {0}")]
  InvalidDocument(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
