use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use storage::dto::leaderboard::{LeaderboardQuery, LeaderboardResponse};

use crate::error::WebError;
use crate::state::AppState;

use super::services;

const EXPORT_FILE_NAME: &str = "leaderboard_top10.csv";

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Leaderboard page retrieved successfully", body = LeaderboardResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let response = services::get_leaderboard(state.store.as_ref(), &query).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/leaderboard/export",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Name, file, score and timestamp of the page as CSV", body = String, content_type = "text/csv"),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "leaderboard"
)]
pub async fn export_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let csv = services::export_leaderboard(state.store.as_ref(), &query).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}
