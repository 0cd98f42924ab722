use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("corrupt row for {name}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("store lock poisoned")]
    Poisoned,
}
