use super::super::{models::rounded_div, AnswerEvent, ScoringConfig};
use super::{ScoreCalculator, ScoreDelta, StreakChange};

/// Base points plus a bonus that shrinks linearly with response time.
/// Wrong answers cost a flat penalty and break the streak.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedBonusCalculator;

impl SpeedBonusCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Bonus for a correct answer given an already clamped response time
    pub fn speed_bonus(clamped_ms: u64, config: &ScoringConfig) -> u32 {
        let max = config.max_answer_time_ms;
        if max == 0 {
            return config.speed_bonus_max;
        }
        let remaining = u128::from(max.saturating_sub(clamped_ms));
        rounded_div(u128::from(config.speed_bonus_max) * remaining, u128::from(max)) as u32
    }
}

impl ScoreCalculator for SpeedBonusCalculator {
    fn calculate(&self, event: &AnswerEvent, config: &ScoringConfig) -> ScoreDelta {
        let clamped = event.response_time_ms.min(config.max_answer_time_ms);

        if event.is_correct {
            let points = config
                .base_points_correct
                .saturating_add(Self::speed_bonus(clamped, config));
            ScoreDelta {
                is_correct: true,
                raw_delta: i32::try_from(points).unwrap_or(i32::MAX),
                clamped_response_time_ms: clamped,
                streak: StreakChange::Increment,
            }
        } else {
            ScoreDelta {
                is_correct: false,
                raw_delta: -i32::try_from(config.wrong_answer_penalty).unwrap_or(i32::MAX),
                clamped_response_time_ms: clamped,
                streak: StreakChange::Reset,
            }
        }
    }

    fn name(&self) -> &'static str {
        "SpeedBonusCalculator"
    }
}
