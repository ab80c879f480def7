pub mod data;
pub mod habit;
pub mod household;
pub mod leaderboard;
pub mod user;
