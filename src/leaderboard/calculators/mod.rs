mod speed_bonus;

pub use speed_bonus::SpeedBonusCalculator;

use super::{AnswerEvent, ScoringConfig};

/// How an answer moves the consecutive-correct counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    Increment,
    Reset,
}

/// Everything the stats store needs to fold one answer into a player's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDelta {
    pub is_correct: bool,
    /// Signed change before the zero floor is applied
    pub raw_delta: i32,
    pub clamped_response_time_ms: u64,
    pub streak: StreakChange,
}

/// Scores a single answer. Implementations must not touch stored state.
pub trait ScoreCalculator: Send + Sync {
    fn calculate(&self, event: &AnswerEvent, config: &ScoringConfig) -> ScoreDelta;

    /// Name for logging
    fn name(&self) -> &'static str;
}
