use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{Result, StorageError};
use crate::models::{Submission, format_timestamp, parse_timestamp};

pub const LEADERBOARD_HEADER: [&str; 5] = ["Name", "File", "Score", "Content", "Timestamp"];

/// Append-only log of scored submissions.
#[async_trait::async_trait]
pub trait LeaderboardStore: Send + Sync {
    async fn append(&self, submission: &Submission) -> Result<()>;

    /// Reads every stored submission in insertion order.
    ///
    /// Fails with [`StorageError::Unavailable`] when the log cannot be read,
    /// which includes the log not existing yet.
    async fn load_all(&self) -> Result<Vec<Submission>>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SubmissionRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "File")]
    file_name: String,
    #[serde(rename = "Score")]
    score: String,
    #[serde(rename = "Content")]
    content: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

impl From<&Submission> for SubmissionRow {
    fn from(submission: &Submission) -> Self {
        Self {
            name: submission.name.clone(),
            file_name: submission.file_name.clone(),
            score: submission.score.to_string(),
            content: submission.code.clone(),
            timestamp: format_timestamp(&submission.timestamp),
        }
    }
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = StorageError;

    fn try_from(row: SubmissionRow) -> Result<Self> {
        let score = Decimal::from_str(row.score.trim())
            .map_err(|e| StorageError::Malformed(format!("score '{}': {}", row.score, e)))?;
        let timestamp = parse_timestamp(&row.timestamp)
            .ok_or_else(|| StorageError::Malformed(format!("timestamp '{}'", row.timestamp)))?;

        Ok(Submission::with_timestamp(
            row.name,
            row.file_name,
            row.content,
            score,
            timestamp,
        ))
    }
}

/// Leaderboard kept in a single CSV file (`Name,File,Score,Content,Timestamp`).
///
/// Appends are not coordinated: two processes, or two concurrent requests,
/// appending at the same moment may interleave or lose rows. Nothing here
/// locks the file.
#[derive(Debug, Clone)]
pub struct CsvLeaderboardStore {
    path: PathBuf,
}

impl CsvLeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn needs_header(&self) -> Result<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(StorageError::Write(e)),
        }
    }
}

#[async_trait::async_trait]
impl LeaderboardStore for CsvLeaderboardStore {
    async fn append(&self, submission: &Submission) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::Write)?;
        }

        let needs_header = self.needs_header().await?;
        if needs_header {
            tracing::info!("Creating leaderboard at {}", self.path.display());
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        if needs_header {
            writer.write_record(LEADERBOARD_HEADER)?;
        }
        writer.serialize(SubmissionRow::from(submission))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| StorageError::Write(e.into_error()))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(StorageError::Write)?;
        file.write_all(&bytes).await.map_err(StorageError::Write)?;
        file.flush().await.map_err(StorageError::Write)?;

        tracing::debug!(
            name = %submission.name,
            score = %submission.score,
            "Appended submission to leaderboard"
        );

        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Submission>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(StorageError::Unavailable)?;

        Ok(parse_log(&bytes))
    }
}

/// Rows that do not parse are skipped so one bad line cannot hide the board.
fn parse_log(bytes: &[u8]) -> Vec<Submission> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut submissions = Vec::new();

    for (index, row) in reader.deserialize::<SubmissionRow>().enumerate() {
        let parsed = row
            .map_err(StorageError::from)
            .and_then(Submission::try_from);

        match parsed {
            Ok(submission) => submissions.push(submission),
            Err(e) => tracing::warn!("Skipping leaderboard row {}: {}", index + 1, e),
        }
    }

    submissions
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::services::leaderboard_view::{ExportedEntry, export_csv, parse_export};

    fn submission(name: &str, score: &str, ts: &str) -> Submission {
        Submission::with_timestamp(
            name,
            "solution.py",
            "def add(a, b):\n    return a + b\n",
            Decimal::from_str(score).unwrap(),
            parse_timestamp(ts).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLeaderboardStore::new(dir.path().join("leaderboard.csv"));

        let err = store.load_all().await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_first_append_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("leaderboard.csv");
        let store = CsvLeaderboardStore::new(&path);

        store
            .append(&submission("Ada", "67.96", "2024-02-03 04:05:06"))
            .await
            .unwrap();
        store
            .append(&submission("Linus", "12.5", "2024-02-03 04:05:07"))
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        let header = LEADERBOARD_HEADER.join(",");
        assert_eq!(header, "Name,File,Score,Content,Timestamp");
        assert_eq!(lines.next(), Some(header.as_str()));
        assert_eq!(text.matches(header.as_str()).count(), 1);
        assert!(text.ends_with("2024-02-03 04:05:07\n"));
    }

    #[tokio::test]
    async fn test_append_and_load_preserves_insertion_order_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLeaderboardStore::new(dir.path().join("leaderboard.csv"));

        let mut tricky = submission("O'Brien, \"Bo\"", "80", "2024-02-03 04:05:06");
        tricky.code = "x = \"a,b\"\nprint(x)\n\n".to_string();
        let plain = submission("Zed", "10", "2024-01-01 00:00:00");

        store.append(&tricky).await.unwrap();
        store.append(&plain).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, vec![tricky, plain]);
    }

    #[tokio::test]
    async fn test_empty_existing_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(&path, "").unwrap();
        let store = CsvLeaderboardStore::new(&path);

        store
            .append(&submission("Ada", "1", "2024-02-03 04:05:06"))
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Name,File,Score,Content,Timestamp\n"));
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        std::fs::write(
            &path,
            "Name,File,Score,Content,Timestamp\n\
             good,a.py,50.0,pass,2024-01-01 10:00:00\n\
             bad,b.py,not-a-number,pass,2024-01-01 10:00:00\n\
             late,c.py,20,pass,yesterday\n\
             also good,d.py,75.25,pass,2024-01-02 10:00:00\n",
        )
        .unwrap();

        let loaded = CsvLeaderboardStore::new(&path).load_all().await.unwrap();
        let names: Vec<_> = loaded.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["good", "also good"]);
        assert_eq!(loaded[1].score, Decimal::from_str("75.25").unwrap());
    }

    #[tokio::test]
    async fn test_export_round_trip_matches_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLeaderboardStore::new(dir.path().join("leaderboard.csv"));
        for (name, score, ts) in [
            ("Ada", "67.96", "2024-02-03 04:05:06"),
            ("Grace, H.", "100", "2024-02-04 04:05:06"),
            ("Linus", "0.5", "2024-02-05 04:05:06"),
        ] {
            store.append(&submission(name, score, ts)).await.unwrap();
        }

        let records = store.load_all().await.unwrap();
        let exported = export_csv(&records).unwrap();
        let parsed: HashSet<ExportedEntry> = parse_export(&exported).unwrap().into_iter().collect();
        let expected: HashSet<ExportedEntry> = records.iter().map(ExportedEntry::from).collect();

        assert_eq!(parsed, expected);
    }
}
