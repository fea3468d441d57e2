//! The four per-submission quality signals. Each one swallows its own
//! failures and falls back to a fixed sentinel value.

use crate::error::ExecutionError;

pub mod correctness;
pub mod efficiency;
pub mod readability;
pub mod security;

pub use correctness::{CORRECTNESS_SENTINEL, evaluate_correctness};
pub use efficiency::{EFFICIENCY_SENTINEL_SECS, evaluate_efficiency};
pub use readability::{READABILITY_SENTINEL, count_long_lines, evaluate_readability};
pub use security::{SECURITY_SENTINEL, count_denylisted, evaluate_security};

/// A missing or misconfigured interpreter turns every score into a sentinel,
/// so it is logged loudly; snippet failures are routine.
pub(crate) fn log_run_failure(metric: &str, error: &ExecutionError) {
    if error.is_spawn_failure() {
        tracing::warn!(metric, "Could not start the interpreter, using sentinel: {}", error);
    } else {
        tracing::debug!(metric, "Snippet run failed, using sentinel: {}", error);
    }
}
