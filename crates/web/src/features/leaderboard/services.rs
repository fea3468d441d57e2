use storage::{
    LeaderboardStore,
    dto::leaderboard::{LeaderboardPage, LeaderboardQuery, LeaderboardResponse},
    error::Result,
    services::leaderboard_view::export_csv,
};

/// Load the requested page; `None` when the store cannot be read yet
async fn load_page(store: &dyn LeaderboardStore, query: &LeaderboardQuery) -> Result<Option<LeaderboardPage>> {
    match store.load_all().await {
        Ok(records) => Ok(Some(query.page(records))),
        Err(e) if e.is_unavailable() => {
            tracing::info!("Leaderboard unavailable, treating as empty: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Get one leaderboard page
pub async fn get_leaderboard(store: &dyn LeaderboardStore, query: &LeaderboardQuery) -> Result<LeaderboardResponse> {
    Ok(load_page(store, query)
        .await?
        .map(LeaderboardResponse::from)
        .unwrap_or_else(LeaderboardResponse::empty))
}

/// Export one leaderboard page as CSV
pub async fn export_leaderboard(store: &dyn LeaderboardStore, query: &LeaderboardQuery) -> Result<Vec<u8>> {
    let submissions = load_page(store, query)
        .await?
        .map(|page| page.submissions)
        .unwrap_or_default();

    export_csv(&submissions)
}
