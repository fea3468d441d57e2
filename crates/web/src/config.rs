use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use evaluator::{CorrectnessPolicy, EvaluatorConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub leaderboard_path: PathBuf,
    pub evaluator: EvaluatorConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = EvaluatorConfig::default();

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            leaderboard_path: std::env::var("LEADERBOARD_PATH")
                .unwrap_or_else(|_| "leaderboard.csv".to_string())
                .into(),
            evaluator: EvaluatorConfig {
                interpreter: std::env::var("PYTHON_BIN").unwrap_or(defaults.interpreter),
                policy: match std::env::var("CORRECTNESS_POLICY") {
                    Ok(raw) => raw
                        .parse::<CorrectnessPolicy>()
                        .map_err(anyhow::Error::msg)
                        .context("Invalid CORRECTNESS_POLICY")?,
                    Err(_) => defaults.policy,
                },
                correctness_timeout: timeout_from_env(
                    "CORRECTNESS_TIMEOUT_SECS",
                    defaults.correctness_timeout,
                )?,
                efficiency_timeout: timeout_from_env(
                    "EFFICIENCY_TIMEOUT_SECS",
                    defaults.efficiency_timeout,
                )?,
            },
        })
    }
}

fn timeout_from_env(key: &str, default: Duration) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", key))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}
