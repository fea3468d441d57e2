use serde::Serialize;
use storage::{LeaderboardStore, Submission, dto::submission::EvaluateRequest};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::Result;
use crate::evaluation::{Evaluation, Evaluator};

/// A scored snippet together with the leaderboard record written for it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScoredSubmission {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub submission: Submission,
}

/// Validates the request, scores the code and appends the result to the leaderboard.
///
/// An invalid request is rejected before anything runs or gets stored.
pub async fn score_submission(
    evaluator: &Evaluator,
    store: &dyn LeaderboardStore,
    request: &EvaluateRequest,
) -> Result<ScoredSubmission> {
    request.validate()?;

    let evaluation = evaluator.evaluate(&request.code).await;
    let submission = Submission::new(
        request.name.trim(),
        request.file_name_or_default(),
        request.code.as_str(),
        evaluation.final_score,
    );

    store.append(&submission).await?;

    tracing::info!(
        name = %submission.name,
        file = %submission.file_name,
        score = %submission.score,
        "Submission scored"
    );

    Ok(ScoredSubmission {
        evaluation,
        submission,
    })
}
