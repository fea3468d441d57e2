pub mod evaluations;
pub mod leaderboard;
