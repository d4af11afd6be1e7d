use rusqlite::ffi;
use thiserror::Error;

/// Storage failure the model layer reports. Uniqueness races and missing
/// rows get their own variants so callers can branch on them; anything
/// else stays opaque.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Other(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            rusqlite::Error::SqliteFailure(e, ref message)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Self::UniqueViolation(message.clone().unwrap_or_else(|| e.to_string()))
            },
            other => Self::Other(other),
        }
    }
}
