use chrono::{Local, NaiveDateTime, SubsecRound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Timestamp layout used in the leaderboard log and exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One scored code entry on the leaderboard.
///
/// Submissions are created once per evaluation and never updated afterwards;
/// the store only ever appends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Submission {
    pub name: String,
    pub file_name: String,
    pub code: String,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::float")]
    pub score: Decimal,
    #[schema(value_type = String, example = "2025-03-14 09:26:53")]
    #[serde(with = "timestamp_serde")]
    pub timestamp: NaiveDateTime,
}

impl Submission {
    /// Creates a submission stamped with the current local time (second precision).
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        code: impl Into<String>,
        score: Decimal,
    ) -> Self {
        Self::with_timestamp(
            name,
            file_name,
            code,
            score,
            Local::now().naive_local().trunc_subsecs(0),
        )
    }

    pub fn with_timestamp(
        name: impl Into<String>,
        file_name: impl Into<String>,
        code: impl Into<String>,
        score: Decimal,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            code: code.into(),
            score: score.round_dp(2),
            timestamp,
        }
    }
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

mod timestamp_serde {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
