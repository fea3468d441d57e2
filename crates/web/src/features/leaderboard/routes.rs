use axum::{Router, routing::get};

use super::handlers::{export_leaderboard, get_leaderboard};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_leaderboard))
        .route("/export", get(export_leaderboard))
}
