use std::sync::Arc;

use evaluator::Evaluator;
use storage::LeaderboardStore;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeaderboardStore>,
    pub evaluator: Arc<Evaluator>,
}

impl AppState {
    pub fn new(store: Arc<dyn LeaderboardStore>, evaluator: Evaluator) -> Self {
        Self {
            store,
            evaluator: Arc::new(evaluator),
        }
    }
}
