use evaluator::{EvaluatorError, ScoredSubmission, score_submission};
use storage::dto::submission::EvaluateRequest;

use crate::state::AppState;

/// Score a snippet and append it to the leaderboard
pub async fn submit(state: &AppState, request: &EvaluateRequest) -> Result<ScoredSubmission, EvaluatorError> {
    score_submission(&state.evaluator, state.store.as_ref(), request).await
}
