mod leaderboard;
mod memory;

pub use leaderboard::{CsvLeaderboardStore, LEADERBOARD_HEADER, LeaderboardStore};
pub use memory::InMemoryLeaderboardStore;
