use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Leaderboard unavailable: {0}")]
    Unavailable(#[source] std::io::Error),

    #[error("Failed to write leaderboard: {0}")]
    Write(#[source] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed record: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// The store could not be read at all; callers show an empty leaderboard.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}
