use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::EvaluatorConfig;
use crate::metrics::{
    CORRECTNESS_SENTINEL, EFFICIENCY_SENTINEL_SECS, READABILITY_SENTINEL, SECURITY_SENTINEL,
    evaluate_correctness, evaluate_efficiency, evaluate_readability, evaluate_security,
};
use crate::runner::{CodeRunner, PythonRunner};
use crate::scoring::{MetricResult, MetricScores};
use crate::snippet::Snippet;

/// Outcome of scoring one snippet
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Evaluation {
    pub metrics: MetricResult,
    pub metric_scores: MetricScores,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::float")]
    pub final_score: Decimal,
}

impl From<MetricResult> for Evaluation {
    fn from(metrics: MetricResult) -> Self {
        let metric_scores = metrics.scores();
        Self {
            metrics,
            metric_scores,
            final_score: metric_scores.final_score(),
        }
    }
}

pub struct Evaluator {
    runner: Arc<dyn CodeRunner>,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        let runner = Arc::new(PythonRunner::new(config.interpreter.clone()));
        Self::with_runner(config, runner)
    }

    pub fn with_runner(config: EvaluatorConfig, runner: Arc<dyn CodeRunner>) -> Self {
        Self { runner, config }
    }

    /// Scores `code`. Never fails: every measurement that goes wrong is
    /// replaced by its sentinel value.
    pub async fn evaluate(&self, code: &str) -> Evaluation {
        let snippet = match Snippet::write(code).await {
            Ok(snippet) => snippet,
            Err(e) => {
                tracing::warn!("Could not write snippet to disk, scoring with sentinels: {}", e);
                return Evaluation::from(MetricResult {
                    correctness: CORRECTNESS_SENTINEL,
                    readability: READABILITY_SENTINEL,
                    security: SECURITY_SENTINEL,
                    efficiency: EFFICIENCY_SENTINEL_SECS,
                });
            }
        };

        let runner = self.runner.as_ref();
        let correctness = evaluate_correctness(
            runner,
            &snippet,
            self.config.policy,
            self.config.correctness_timeout,
        )
        .await;
        let readability = evaluate_readability(&snippet).await;
        let security = evaluate_security(&snippet).await;
        let efficiency = evaluate_efficiency(runner, &snippet, self.config.efficiency_timeout).await;

        let metrics = MetricResult {
            correctness,
            readability,
            security,
            efficiency,
        };
        tracing::debug!(?metrics, "Snippet measured");

        Evaluation::from(metrics)
    }
}
