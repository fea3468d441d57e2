pub mod leaderboard_view;
