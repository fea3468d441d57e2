use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evaluator::{ScoredSubmission, decode_source};
use storage::dto::submission::{DEFAULT_UPLOADED_FILE_NAME, EvaluateRequest};
use utoipa::ToSchema;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/evaluations",
    request_body = EvaluateRequest,
    responses(
        (status = 201, description = "Snippet scored and added to the leaderboard", body = ScoredSubmission),
        (status = 400, description = "Name or code missing")
    ),
    tag = "evaluations"
)]
pub async fn create_evaluation(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Response, WebError> {
    let scored = services::submit(&state, &request).await?;

    Ok((StatusCode::CREATED, Json(scored)).into_response())
}

/// Form accepted by the upload endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    name: String,
    /// Python source file; decoded as UTF-8, invalid bytes dropped
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/evaluations/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Uploaded file scored and added to the leaderboard", body = ScoredSubmission),
        (status = 400, description = "Name or file missing, or malformed form data")
    ),
    tag = "evaluations"
)]
pub async fn upload_evaluation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let mut request = EvaluateRequest {
        name: String::new(),
        code: String::new(),
        file_name: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(e.body_text()))?
    {
        let field_name = field.name().map(str::to_string);

        match field_name.as_deref() {
            Some("name") => {
                request.name = field
                    .text()
                    .await
                    .map_err(|e| WebError::BadRequest(e.body_text()))?;
            }
            Some("file") => {
                request.file_name = Some(
                    field
                        .file_name()
                        .filter(|file_name| !file_name.trim().is_empty())
                        .unwrap_or(DEFAULT_UPLOADED_FILE_NAME)
                        .to_string(),
                );
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| WebError::BadRequest(e.body_text()))?;
                request.code = decode_source(&bytes);
            }
            other => tracing::debug!("Ignoring unexpected form field {:?}", other),
        }
    }

    let scored = services::submit(&state, &request).await?;

    Ok((StatusCode::CREATED, Json(scored)).into_response())
}
