use quiz_leaderboard::AnswerEvent;

// ============================================================================
// Answer Creation Helpers
// ============================================================================

#[allow(dead_code)]
pub fn correct(player_id: &str, response_time_ms: u64) -> AnswerEvent {
    AnswerEvent::new(player_id, "q", true, response_time_ms)
}

#[allow(dead_code)]
pub fn wrong(player_id: &str, response_time_ms: u64) -> AnswerEvent {
    AnswerEvent::new(player_id, "q", false, response_time_ms)
}

/// Builds a sequence of answers, numbering questions as it goes
#[allow(dead_code)]
pub struct AnswerScript {
    events: Vec<AnswerEvent>,
}

#[allow(dead_code)]
impl AnswerScript {
    pub fn new() -> Self {
        Self { events: vec![] }
    }

    pub fn correct(self, player_id: &str, response_time_ms: u64) -> Self {
        self.push(player_id, true, response_time_ms)
    }

    pub fn wrong(self, player_id: &str, response_time_ms: u64) -> Self {
        self.push(player_id, false, response_time_ms)
    }

    pub fn build(self) -> Vec<AnswerEvent> {
        self.events
    }

    fn push(mut self, player_id: &str, is_correct: bool, response_time_ms: u64) -> Self {
        let question_id = format!("q{}", self.events.len() + 1);
        self.events.push(AnswerEvent::new(
            player_id,
            question_id,
            is_correct,
            response_time_ms,
        ));
        self
    }
}
