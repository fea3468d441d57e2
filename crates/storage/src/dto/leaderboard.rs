use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Submission;
use crate::services::leaderboard_view;

pub const EMPTY_LEADERBOARD_MESSAGE: &str = "Leaderboard is empty. Be the first to submit!";

const MAX_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Score,
    Timestamp,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "timestamp" | "date" => Ok(Self::Timestamp),
            other => Err(format!("unknown sort key '{}': expected score or timestamp", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score => write!(f, "score"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[default]
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction '{}': expected asc or desc", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Leaderboard search, ordering and page size
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Case-insensitive substring of the submitter name
    pub name: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            name: None,
            sort: SortKey::default(),
            direction: SortDirection::default(),
            limit: default_limit(),
        }
    }
}

impl LeaderboardQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(format!("limit must be between 1 and {}", MAX_LIMIT));
        }
        Ok(())
    }

    /// Filters, sorts and truncates `records` into one leaderboard page.
    pub fn page(&self, records: Vec<Submission>) -> LeaderboardPage {
        let last_updated = leaderboard_view::last_updated(&records);
        let filtered = leaderboard_view::filter_by_name(records, self.name.as_deref().unwrap_or(""));
        let total_items = filtered.len();
        let sorted = leaderboard_view::sort_by(filtered, self.sort, self.direction);

        LeaderboardPage {
            submissions: leaderboard_view::top_n(sorted, self.limit),
            total_items,
            last_updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeaderboardPage {
    pub submissions: Vec<Submission>,
    /// Records matching the name filter, before truncation
    pub total_items: usize,
    /// Newest timestamp across the whole store
    pub last_updated: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub file_name: String,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::float")]
    pub score: Decimal,
    #[schema(value_type = String)]
    pub timestamp: String,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub total_items: usize,
    #[schema(value_type = Option<String>)]
    pub last_updated: Option<String>,
    pub message: Option<String>,
}

impl LeaderboardResponse {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            total_items: 0,
            last_updated: None,
            message: Some(EMPTY_LEADERBOARD_MESSAGE.to_string()),
        }
    }
}

impl From<LeaderboardPage> for LeaderboardResponse {
    fn from(page: LeaderboardPage) -> Self {
        let entries = page
            .submissions
            .into_iter()
            .enumerate()
            .map(|(index, submission)| LeaderboardEntry {
                rank: index + 1,
                timestamp: crate::models::format_timestamp(&submission.timestamp),
                name: submission.name,
                file_name: submission.file_name,
                score: submission.score,
                code: submission.code,
            })
            .collect();

        Self {
            entries,
            total_items: page.total_items,
            last_updated: page.last_updated.as_ref().map(crate::models::format_timestamp),
            message: None,
        }
    }
}
