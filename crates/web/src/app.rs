use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{evaluations, leaderboard};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        evaluations::handlers::create_evaluation,
        evaluations::handlers::upload_evaluation,
        leaderboard::handlers::get_leaderboard,
        leaderboard::handlers::export_leaderboard,
    ),
    components(
        schemas(
            storage::dto::submission::EvaluateRequest,
            evaluations::handlers::UploadForm,
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::SortKey,
            storage::dto::leaderboard::SortDirection,
            storage::models::Submission,
            evaluator::ScoredSubmission,
            evaluator::Evaluation,
            evaluator::MetricResult,
            evaluator::MetricScores,
        )
    ),
    tags(
        (name = "evaluations", description = "Score Python snippets"),
        (name = "leaderboard", description = "Search, sort and export scored submissions"),
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let api = Router::new()
        .nest("/evaluations", evaluations::routes::routes())
        .nest("/leaderboard", leaderboard::routes::routes());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use evaluator::{Evaluator, EvaluatorConfig};
    use storage::{InMemoryLeaderboardStore, LeaderboardStore, Submission, models::parse_timestamp};
    use tower::ServiceExt;

    use super::*;

    // No interpreter under this name: every run fails fast with a spawn error,
    // so the process-based metrics fall back to their sentinels.
    fn offline_evaluator() -> Evaluator {
        Evaluator::new(EvaluatorConfig {
            interpreter: "no-such-python-interpreter".to_string(),
            ..EvaluatorConfig::default()
        })
    }

    fn app(store: Arc<InMemoryLeaderboardStore>) -> Router {
        router(AppState::new(store, offline_evaluator()))
    }

    fn seeded_store() -> Arc<InMemoryLeaderboardStore> {
        let entries = [
            ("Ada", 10, "2024-01-01 09:00:00"),
            ("Grace", 90, "2024-01-02 09:00:00"),
            ("adam", 50, "2024-01-03 09:00:00"),
        ];
        Arc::new(InMemoryLeaderboardStore::with_submissions(
            entries
                .iter()
                .map(|(name, score, ts)| {
                    Submission::with_timestamp(
                        *name,
                        "main.py",
                        "print('hi')",
                        (*score).into(),
                        parse_timestamp(ts).unwrap(),
                    )
                })
                .collect(),
        ))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(InMemoryLeaderboardStore::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_evaluation_is_scored_and_recorded() {
        let store = Arc::new(InMemoryLeaderboardStore::new());
        let response = app(store.clone())
            .oneshot(json_post(
                "/api/evaluations",
                serde_json::json!({
                    "name": "Ada",
                    "code": "import os\nos.system('rm -rf /')\n",
                    "file_name": "danger.py"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["metrics"]["security"], 1);
        assert_eq!(json["metric_scores"]["Security"], 80.0);
        // Spawn failures: correctness 0, efficiency penalty
        assert_eq!(json["metrics"]["correctness"], 0);
        assert_eq!(json["metric_scores"]["Efficiency"], 0.0);
        // 0.4*0 + 0.2*(100 + 80 + 0)
        assert_eq!(json["final_score"], 36.0);
        assert_eq!(json["submission"]["file_name"], "danger.py");

        let stored = store.load_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected_and_not_stored() {
        let store = seeded_store();
        let response = app(store.clone())
            .oneshot(json_post(
                "/api/evaluations",
                serde_json::json!({ "name": "", "code": "def add(a,b): return a+b" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_missing_code_is_rejected() {
        let store = Arc::new(InMemoryLeaderboardStore::new());
        let response = app(store.clone())
            .oneshot(json_post("/api/evaluations", serde_json::json!({ "name": "Ada" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_uses_part_file_name() {
        let store = Arc::new(InMemoryLeaderboardStore::new());
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nLinus\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"solution.py\"\r\n\
             Content-Type: text/x-python\r\n\r\ndef add(a, b):\n    return a + b\n\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/evaluations/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app(store.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = store.load_all().await.unwrap();
        assert_eq!(stored[0].name, "Linus");
        assert_eq!(stored[0].file_name, "solution.py");
        assert_eq!(stored[0].code, "def add(a, b):\n    return a + b\n");
    }

    #[tokio::test]
    async fn test_upload_drops_invalid_utf8() {
        let store = Arc::new(InMemoryLeaderboardStore::new());
        let boundary = "XBOUNDARYX";
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nLinus\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"latin1.py\"\r\n\r\n",
            b = boundary
        )
        .into_bytes();
        body.extend_from_slice(b"x = 'caf\xe9'\n");
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/evaluations/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app(store.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = store.load_all().await.unwrap();
        assert_eq!(stored[0].code, "x = 'caf'\n");
    }

    #[tokio::test]
    async fn test_leaderboard_sorted_by_score() {
        let response = app(seeded_store())
            .oneshot(Request::get("/api/leaderboard").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let names: Vec<_> = json["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Grace", "adam", "Ada"]);
        assert_eq!(json["entries"][0]["rank"], 1);
        assert_eq!(json["total_items"], 3);
        assert_eq!(json["last_updated"], "2024-01-03 09:00:00");
    }

    #[tokio::test]
    async fn test_leaderboard_search_and_limit() {
        let response = app(seeded_store())
            .oneshot(
                Request::get("/api/leaderboard?name=AD&sort=timestamp&direction=asc&limit=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["total_items"], 2);
        assert_eq!(json["entries"].as_array().unwrap().len(), 1);
        assert_eq!(json["entries"][0]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_invalid_limit_is_bad_request() {
        let response = app(seeded_store())
            .oneshot(Request::get("/api/leaderboard?limit=0").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unavailable_store_reads_as_empty() {
        let store = Arc::new(InMemoryLeaderboardStore::unavailable());
        let response = app(store)
            .oneshot(Request::get("/api/leaderboard").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["entries"].as_array().unwrap().is_empty());
        assert_eq!(json["message"], storage::dto::leaderboard::EMPTY_LEADERBOARD_MESSAGE);
    }

    #[tokio::test]
    async fn test_export_is_csv_attachment() {
        let response = app(seeded_store())
            .oneshot(
                Request::get("/api/leaderboard/export?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("leaderboard_top10.csv")
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            "Name,File,Score,Timestamp\n\
             Grace,main.py,90,2024-01-02 09:00:00\n\
             adam,main.py,50,2024-01-03 09:00:00\n"
        );
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app(Arc::new(InMemoryLeaderboardStore::new()))
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"]["/api/evaluations"].is_object());
        assert!(json["paths"]["/api/leaderboard/export"].is_object());
    }
}
