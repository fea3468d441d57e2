use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvaluatorError>;

/// Failure while running a snippet. Metrics recover from these with a
/// sentinel score; they never reach the caller of an evaluation.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to start interpreter: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("I/O error while running snippet: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snippet exceeded the {0:?} time limit")]
    Timeout(Duration),

    #[error("Snippet exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("Unexpected harness output: {0}")]
    HarnessOutput(String),
}

impl ExecutionError {
    /// The interpreter never started, which points at configuration rather
    /// than at the submitted code.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::Spawn(_))
    }
}

#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}
