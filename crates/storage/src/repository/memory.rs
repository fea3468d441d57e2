use tokio::sync::RwLock;

use crate::error::{Result, StorageError};
use crate::models::Submission;

use super::LeaderboardStore;

/// Leaderboard held in memory, for tests and throwaway runs.
#[derive(Debug, Default)]
pub struct InMemoryLeaderboardStore {
    submissions: RwLock<Vec<Submission>>,
    unavailable: bool,
}

impl InMemoryLeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submissions(submissions: Vec<Submission>) -> Self {
        Self {
            submissions: RwLock::new(submissions),
            unavailable: false,
        }
    }

    /// A store whose reads always fail, like a log that was never created.
    pub fn unavailable() -> Self {
        Self {
            submissions: RwLock::default(),
            unavailable: true,
        }
    }

    pub async fn len(&self) -> usize {
        self.submissions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl LeaderboardStore for InMemoryLeaderboardStore {
    async fn append(&self, submission: &Submission) -> Result<()> {
        self.submissions.write().await.push(submission.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Submission>> {
        if self.unavailable {
            return Err(StorageError::Unavailable(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "in-memory leaderboard marked unavailable",
            )));
        }
        Ok(self.submissions.read().await.clone())
    }
}
