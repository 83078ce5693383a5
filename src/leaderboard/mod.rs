pub mod calculators;
pub mod config;
pub mod diff;
pub mod engine;
pub mod highlights;
pub mod models;
pub mod ranking;
pub mod repository;
pub mod roster;
pub mod service;
pub mod visibility;

mod errors;

pub use calculators::{ScoreCalculator, ScoreDelta, SpeedBonusCalculator, StreakChange};
pub use config::{ScoringConfig, ScoringConfigPatch};
pub use diff::compute_rank_changes;
pub use engine::{LeaderboardEngine, LeaderboardEngineBuilder, RankingScope};
pub use errors::LeaderboardError;
pub use highlights::HighlightType;
pub use models::*;
pub use ranking::{compare_entries, sort_by_rank};
pub use repository::{InMemoryPlayerStatsStore, PlayerStatsStore};
pub use roster::Roster;
pub use service::{LeaderboardService, LeaderboardServiceBuilder, PublicLeaderboard};
pub use visibility::{VisibilityGate, VisibilityMode};
