use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calculators::{ScoreDelta, StreakChange};
use super::highlights::HighlightType;

/// Identity of a participant, owned by the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Player {
    pub fn new(player_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            nickname: nickname.into(),
            avatar_url: None,
            color: None,
        }
    }

    /// Stand-in identity for a player who answered before joining the roster
    pub fn placeholder(player_id: &str) -> Self {
        Self::new(player_id, player_id)
    }
}

/// Running aggregate for one player in one game.
///
/// Ranks are 1-based; `0` means the player has never been ranked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_id: String,
    pub total_score: u32,
    pub total_correct: u32,
    pub total_answered: u32,
    pub accuracy_percent: u32,
    pub cumulative_speed_ms: u64,
    pub average_speed_ms: u64,
    pub streak_correct: u32,
    pub best_streak: u32,
    pub last_answer_was_correct: bool,
    pub last_score_delta: i32,
    pub last_response_time_ms: u64,
    pub last_answered_at: Option<DateTime<Utc>>,
    pub current_rank: u32,
    pub previous_rank: u32,
    pub last_delta_rank: i32,
}

impl PlayerStats {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ..Self::default()
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.current_rank > 0
    }

    /// Folds one scored answer into the aggregate.
    ///
    /// The score is floored at zero and `last_score_delta` holds the change
    /// that was actually applied, which can be smaller than the raw penalty.
    pub fn record_answer(&mut self, delta: &ScoreDelta, answered_at: DateTime<Utc>) {
        let before = i64::from(self.total_score);
        let after = (before + i64::from(delta.raw_delta)).clamp(0, i64::from(u32::MAX));
        self.total_score = after as u32;
        self.last_score_delta = (after - before) as i32;

        self.total_answered = self.total_answered.saturating_add(1);
        if delta.is_correct {
            self.total_correct = self.total_correct.saturating_add(1);
        }
        self.cumulative_speed_ms = self
            .cumulative_speed_ms
            .saturating_add(delta.clamped_response_time_ms);

        match delta.streak {
            StreakChange::Increment => {
                self.streak_correct = self.streak_correct.saturating_add(1);
                self.best_streak = self.best_streak.max(self.streak_correct);
            }
            StreakChange::Reset => self.streak_correct = 0,
        }

        self.last_answer_was_correct = delta.is_correct;
        self.last_response_time_ms = delta.clamped_response_time_ms;
        self.last_answered_at = Some(answered_at);

        self.accuracy_percent = rounded_div(
            100 * u128::from(self.total_correct),
            u128::from(self.total_answered),
        ) as u32;
        self.average_speed_ms = rounded_div(
            u128::from(self.cumulative_speed_ms),
            u128::from(self.total_answered),
        ) as u64;
    }

    /// Moves the player to `rank`, keeping the old rank as `previous_rank`.
    /// A first-ever ranking has no movement.
    pub fn assign_rank(&mut self, rank: u32) {
        self.previous_rank = if self.is_ranked() {
            self.current_rank
        } else {
            rank
        };
        self.current_rank = rank;
        self.last_delta_rank = self.previous_rank as i32 - rank as i32;
    }
}

/// Half-up integer division; zero when the divisor is zero.
/// Integer division rounding half up; 0 when `denominator` is 0
pub(crate) fn rounded_div(numerator: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        return 0;
    }
    (2 * numerator + denominator) / (2 * denominator)
}

/// A single answer submitted by a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    pub player_id: String,
    pub question_id: String,
    pub is_correct: bool,
    pub response_time_ms: u64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl AnswerEvent {
    pub fn new(
        player_id: impl Into<String>,
        question_id: impl Into<String>,
        is_correct: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            question_id: question_id.into(),
            is_correct,
            response_time_ms,
            timestamp: Utc::now(),
        }
    }
}

/// One row of a ranking cycle: identity, stats and presentation hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player: Player,
    pub stats: PlayerStats,
    pub is_highlighted: bool,
    pub highlight_type: Option<HighlightType>,
    pub show_delta_label: bool,
}

impl LeaderboardEntry {
    pub fn new(player: Player, stats: PlayerStats) -> Self {
        Self {
            player,
            stats,
            is_highlighted: false,
            highlight_type: None,
            show_delta_label: false,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.stats.player_id
    }

    pub fn rank(&self) -> u32 {
        self.stats.current_rank
    }
}

/// Rank transition of one player between two ranking cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankChangeEvent {
    pub player_id: String,
    pub nickname: String,
    pub old_rank: u32,
    pub new_rank: u32,
    /// Positive when the player moved toward rank 1
    pub rank_delta: i32,
    pub score_delta: i32,
    pub became_champion: bool,
    #[serde(rename = "enteredTop3")]
    pub entered_top3: bool,
}

/// Result of one full sort, diff and rank-assignment cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardUpdate {
    pub cycle: u64,
    pub entries: Vec<LeaderboardEntry>,
    pub changes: Vec<RankChangeEvent>,
}
