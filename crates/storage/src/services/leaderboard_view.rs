use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dto::leaderboard::{SortDirection, SortKey};
use crate::error::{Result, StorageError};
use crate::models::{Submission, format_timestamp, parse_timestamp};

/// Keeps records whose name contains `needle`, ignoring case.
/// A blank needle keeps everything; otherwise it is matched as given,
/// surrounding spaces included.
pub fn filter_by_name(records: Vec<Submission>, needle: &str) -> Vec<Submission> {
    if needle.trim().is_empty() {
        return records;
    }
    let needle = needle.to_lowercase();

    records
        .into_iter()
        .filter(|record| record.name.to_lowercase().contains(&needle))
        .collect()
}

/// Stable sort: ties keep their insertion order in both directions.
pub fn sort_by(mut records: Vec<Submission>, key: SortKey, direction: SortDirection) -> Vec<Submission> {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    records
}

fn compare(a: &Submission, b: &Submission, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => a.score.cmp(&b.score),
        SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
    }
}

pub fn top_n(mut records: Vec<Submission>, n: usize) -> Vec<Submission> {
    records.truncate(n);
    records
}

pub fn last_updated(records: &[Submission]) -> Option<NaiveDateTime> {
    records.iter().map(|record| record.timestamp).max()
}

#[derive(Debug, Serialize, Deserialize)]
struct ExportRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "File")]
    file_name: String,
    #[serde(rename = "Score")]
    score: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

/// One exported leaderboard line, without the submitted code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportedEntry {
    pub name: String,
    pub file_name: String,
    pub score: Decimal,
    pub timestamp: NaiveDateTime,
}

impl From<&Submission> for ExportedEntry {
    fn from(submission: &Submission) -> Self {
        Self {
            name: submission.name.clone(),
            file_name: submission.file_name.clone(),
            score: submission.score,
            timestamp: submission.timestamp,
        }
    }
}

/// Serializes name, file, score and timestamp columns as UTF-8 CSV with a header row.
pub fn export_csv(records: &[Submission]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if records.is_empty() {
        writer.write_record(["Name", "File", "Score", "Timestamp"])?;
    }

    for record in records {
        writer.serialize(ExportRow {
            name: record.name.clone(),
            file_name: record.file_name.clone(),
            score: record.score.to_string(),
            timestamp: format_timestamp(&record.timestamp),
        })?;
    }

    writer
        .into_inner()
        .map_err(|e| StorageError::Write(e.into_error()))
}

/// Parses a CSV produced by [`export_csv`].
pub fn parse_export(bytes: &[u8]) -> Result<Vec<ExportedEntry>> {
    let mut reader = csv::Reader::from_reader(bytes);

    reader
        .deserialize::<ExportRow>()
        .map(|row| {
            let row = row?;
            let score = Decimal::from_str(row.score.trim())
                .map_err(|e| StorageError::Malformed(format!("score '{}': {}", row.score, e)))?;
            let timestamp = parse_timestamp(&row.timestamp)
                .ok_or_else(|| StorageError::Malformed(format!("timestamp '{}'", row.timestamp)))?;

            Ok(ExportedEntry {
                name: row.name,
                file_name: row.file_name,
                score,
                timestamp,
            })
        })
        .collect()
}
