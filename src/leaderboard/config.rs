use serde::{Deserialize, Serialize};

/// Scoring and highlight tuning for one leaderboard.
///
/// Loaded once per game and only ever replaced wholesale; a merge with a
/// [`ScoringConfigPatch`] produces a new value instead of mutating in place.
///
/// Example JSON:
/// ```json
/// { "basePointsCorrect": 100, "speedBonusMax": 60, "maxAnswerTimeMs": 30000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringConfig {
    /// Points for any correct answer, before the speed bonus
    pub base_points_correct: u32,
    /// Largest bonus a correct answer can earn (instant response)
    pub speed_bonus_max: u32,
    /// Points removed for a wrong answer
    pub wrong_answer_penalty: u32,
    /// Response times above this are clamped before scoring
    pub max_answer_time_ms: u64,
    /// Consecutive correct answers needed for a streak highlight
    pub streak_threshold: u32,
    /// Correct answers at or under this time are highlighted as fast
    pub fast_threshold_ms: u64,
    /// Answers at or over this time are highlighted as slow
    pub slow_threshold_ms: u64,
    /// Rank movement (either direction) that counts as a jump
    pub rank_jump_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_points_correct: 100,
            speed_bonus_max: 50,
            wrong_answer_penalty: 0,
            max_answer_time_ms: 30_000,
            streak_threshold: 3,
            fast_threshold_ms: 5_000,
            slow_threshold_ms: 20_000,
            rank_jump_threshold: 3,
        }
    }
}

impl ScoringConfig {
    /// Returns a copy of this config with every field set in `patch` overridden.
    pub fn merged(&self, patch: &ScoringConfigPatch) -> Self {
        Self {
            base_points_correct: patch.base_points_correct.unwrap_or(self.base_points_correct),
            speed_bonus_max: patch.speed_bonus_max.unwrap_or(self.speed_bonus_max),
            wrong_answer_penalty: patch
                .wrong_answer_penalty
                .unwrap_or(self.wrong_answer_penalty),
            max_answer_time_ms: patch.max_answer_time_ms.unwrap_or(self.max_answer_time_ms),
            streak_threshold: patch.streak_threshold.unwrap_or(self.streak_threshold),
            fast_threshold_ms: patch.fast_threshold_ms.unwrap_or(self.fast_threshold_ms),
            slow_threshold_ms: patch.slow_threshold_ms.unwrap_or(self.slow_threshold_ms),
            rank_jump_threshold: patch
                .rank_jump_threshold
                .unwrap_or(self.rank_jump_threshold),
        }
    }
}

/// Partial override for [`ScoringConfig`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScoringConfigPatch {
    #[serde(default)]
    pub base_points_correct: Option<u32>,
    #[serde(default)]
    pub speed_bonus_max: Option<u32>,
    #[serde(default)]
    pub wrong_answer_penalty: Option<u32>,
    #[serde(default)]
    pub max_answer_time_ms: Option<u64>,
    #[serde(default)]
    pub streak_threshold: Option<u32>,
    #[serde(default)]
    pub fast_threshold_ms: Option<u64>,
    #[serde(default)]
    pub slow_threshold_ms: Option<u64>,
    #[serde(default)]
    pub rank_jump_threshold: Option<u32>,
}

impl ScoringConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
