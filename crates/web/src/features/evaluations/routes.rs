use axum::{Router, routing::post};

use super::handlers::{create_evaluation, upload_evaluation};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_evaluation))
        .route("/upload", post(upload_evaluation))
}
