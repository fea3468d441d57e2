pub mod config;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod runner;
pub mod scoring;
pub mod snippet;
pub mod submission;

pub use config::{CorrectnessPolicy, EvaluatorConfig};
pub use error::{EvaluatorError, ExecutionError, Result};
pub use evaluation::{Evaluation, Evaluator};
pub use runner::{CodeRunner, PythonRunner, RunOutput};
pub use scoring::{MetricResult, MetricScores, compute_final_score, metric_scores};
pub use snippet::{Snippet, decode_source};
pub use submission::{ScoredSubmission, score_submission};
