use std::sync::Arc;

use anyhow::Context;
use evaluator::Evaluator;
use storage::CsvLeaderboardStore;

mod app;
mod config;
mod error;
mod features;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting snippet scoring API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Leaderboard file: {}",
        config.leaderboard_path.display()
    );
    tracing::info!(
        "Running snippets with '{}' ({} correctness policy)",
        config.evaluator.interpreter,
        config.evaluator.policy
    );

    let store = Arc::new(CsvLeaderboardStore::new(&config.leaderboard_path));
    let state = AppState::new(store, Evaluator::new(config.evaluator.clone()));

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app::router(state)).await?;

    Ok(())
}
