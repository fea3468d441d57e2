use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

pub const CORRECTNESS_WEIGHT: f64 = 0.4;
pub const READABILITY_WEIGHT: f64 = 0.2;
pub const SECURITY_WEIGHT: f64 = 0.2;
pub const EFFICIENCY_WEIGHT: f64 = 0.2;

const CORRECTNESS_POINTS: f64 = 20.0;
const READABILITY_PENALTY: f64 = 5.0;
const SECURITY_PENALTY: f64 = 20.0;
const EFFICIENCY_PENALTY_PER_SEC: f64 = 10.0;

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

/// Raw measurements for one submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MetricResult {
    /// 0 to 5
    pub correctness: u32,
    /// Lines over 100 characters
    pub readability: u32,
    /// Denylisted substrings present
    pub security: u32,
    /// Run time in seconds
    pub efficiency: f64,
}

impl MetricResult {
    pub fn scores(&self) -> MetricScores {
        metric_scores(
            f64::from(self.correctness),
            f64::from(self.readability),
            f64::from(self.security),
            self.efficiency,
        )
    }

    pub fn final_score(&self) -> Decimal {
        self.scores().final_score()
    }
}

/// Per-metric scores on a 0-100 scale, keyed by display name for the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct MetricScores {
    pub correctness: f64,
    pub readability: f64,
    pub security: f64,
    pub efficiency: f64,
}

impl MetricScores {
    /// Weighted sum rounded to two decimals.
    pub fn final_score(&self) -> Decimal {
        let weighted = CORRECTNESS_WEIGHT * self.correctness
            + READABILITY_WEIGHT * self.readability
            + SECURITY_WEIGHT * self.security
            + EFFICIENCY_WEIGHT * self.efficiency;

        Decimal::from_f64_retain(weighted)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2)
    }

    pub fn as_pairs(&self) -> [(&'static str, f64); 4] {
        [
            ("Correctness", self.correctness),
            ("Readability", self.readability),
            ("Security", self.security),
            ("Efficiency", self.efficiency),
        ]
    }
}

/// Normalizes raw metric values to 0-100. Every output is clamped, whatever
/// the input; NaN counts as the worst possible value.
pub fn metric_scores(correctness: f64, readability: f64, security: f64, efficiency: f64) -> MetricScores {
    MetricScores {
        correctness: clamp_score(correctness * CORRECTNESS_POINTS),
        readability: clamp_score(MAX_SCORE - readability * READABILITY_PENALTY),
        security: clamp_score(MAX_SCORE - security * SECURITY_PENALTY),
        efficiency: clamp_score(MAX_SCORE - efficiency * EFFICIENCY_PENALTY_PER_SEC),
    }
}

pub fn compute_final_score(correctness: f64, readability: f64, security: f64, efficiency: f64) -> Decimal {
    metric_scores(correctness, readability, security, efficiency).final_score()
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_SCORE;
    }
    value.clamp(MIN_SCORE, MAX_SCORE)
}
