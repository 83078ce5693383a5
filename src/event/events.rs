use serde::{Deserialize, Serialize};

use crate::leaderboard::{
    LeaderboardEntry, Player, PlayerStats, RankChangeEvent, VisibilityMode,
};

/// Facts published for one game's leaderboard.
///
/// Consumers (socket fan-out, celebration effects, loggers) react to these;
/// nothing on the bus ever feeds back into scores or ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum LeaderboardEvent {
    PlayerJoined {
        player: Player,
    },

    PlayerLeft {
        player_id: String,
    },

    /// A single answer was scored
    AnswerProcessed {
        stats: PlayerStats,
    },

    /// A ranking cycle finished; entries are in rank order
    RankingUpdated {
        cycle: u64,
        entries: Vec<LeaderboardEntry>,
    },

    /// One player's rank moved during the last cycle
    RankChanged(RankChangeEvent),

    VisibilityChanged {
        mode: VisibilityMode,
    },

    GameEnded,

    GameReset,
}

impl LeaderboardEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LeaderboardEvent::PlayerJoined { .. } => "player_joined",
            LeaderboardEvent::PlayerLeft { .. } => "player_left",
            LeaderboardEvent::AnswerProcessed { .. } => "answer_processed",
            LeaderboardEvent::RankingUpdated { .. } => "ranking_updated",
            LeaderboardEvent::RankChanged(_) => "rank_changed",
            LeaderboardEvent::VisibilityChanged { .. } => "visibility_changed",
            LeaderboardEvent::GameEnded => "game_ended",
            LeaderboardEvent::GameReset => "game_reset",
        }
    }
}
