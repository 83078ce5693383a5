// Library crate for the quiz leaderboard server
// This file exposes the public API for integration tests

pub mod api;
pub mod config;
pub mod event;
pub mod leaderboard;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use api::build_router;
pub use config::{Config, ConfigError};
pub use event::{CelebrationLogger, EventBus, LeaderboardEvent};
pub use leaderboard::{
    AnswerEvent, LeaderboardEngine, LeaderboardEntry, LeaderboardService, LeaderboardUpdate,
    Player, PlayerStats, RankChangeEvent, ScoringConfig, ScoringConfigPatch, VisibilityMode,
};
pub use shared::{AppError, AppState};
