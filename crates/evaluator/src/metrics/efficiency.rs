use std::time::Duration;

use super::log_run_failure;
use crate::runner::CodeRunner;
use crate::snippet::Snippet;

/// Seconds reported when the run fails or times out.
pub const EFFICIENCY_SENTINEL_SECS: f64 = 10.0;

/// Wall-clock seconds taken to run the snippet once.
pub async fn evaluate_efficiency(runner: &dyn CodeRunner, snippet: &Snippet, timeout: Duration) -> f64 {
    match runner.run(snippet.path(), snippet.dir(), timeout).await {
        Ok(output) => output.elapsed.as_secs_f64(),
        Err(e) => {
            log_run_failure("efficiency", &e);
            EFFICIENCY_SENTINEL_SECS
        }
    }
}
