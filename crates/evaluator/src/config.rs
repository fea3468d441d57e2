use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the correctness metric is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectnessPolicy {
    /// Run the snippet; if it exits cleanly, count `def ` occurrences (max 5).
    #[default]
    FunctionCount,
    /// Run a fixed table of `add`/`multiply` cases against the snippet.
    TestTable,
}

impl FromStr for CorrectnessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "function-count" => Ok(Self::FunctionCount),
            "test-table" => Ok(Self::TestTable),
            other => Err(format!(
                "unknown correctness policy '{}': expected function-count or test-table",
                other
            )),
        }
    }
}

impl fmt::Display for CorrectnessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FunctionCount => write!(f, "function-count"),
            Self::TestTable => write!(f, "test-table"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Interpreter used to run snippets, resolved against a fixed PATH
    pub interpreter: String,
    pub policy: CorrectnessPolicy,
    pub correctness_timeout: Duration,
    pub efficiency_timeout: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            policy: CorrectnessPolicy::default(),
            correctness_timeout: Duration::from_secs(5),
            efficiency_timeout: Duration::from_secs(3),
        }
    }
}
