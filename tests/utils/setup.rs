use std::sync::Arc;

use quiz_leaderboard::{
    AppState, EventBus, LeaderboardService, Player, ScoringConfig, VisibilityMode,
};

use super::mocks::RecordingHandler;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Scoring used throughout the worked examples: 100 base, up to 60 bonus,
/// 10 penalty, 30s answer window
#[allow(dead_code)]
pub fn spec_config() -> ScoringConfig {
    ScoringConfig {
        base_points_correct: 100,
        speed_bonus_max: 60,
        wrong_answer_penalty: 10,
        max_answer_time_ms: 30_000,
        ..ScoringConfig::default()
    }
}

#[allow(dead_code)]
pub struct TestSetup {
    pub game_id: String,
    pub service: Arc<LeaderboardService>,
    pub recorder: RecordingHandler,
    pub players: Vec<String>,
}

#[allow(dead_code)]
impl TestSetup {
    pub fn app_state(&self) -> AppState {
        AppState::new(Arc::clone(&self.service))
    }
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    game_id: String,
    visibility: VisibilityMode,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            game_id: "quiz-123".to_string(),
            visibility: VisibilityMode::AlwaysOn,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie"])
    }

    pub fn with_visibility(mut self, visibility: VisibilityMode) -> Self {
        self.visibility = visibility;
        self
    }

    pub async fn build(self) -> TestSetup {
        let recorder = RecordingHandler::new();
        let service = LeaderboardService::builder(EventBus::default())
            .with_default_config(spec_config())
            .with_default_visibility(self.visibility)
            .with_handler(Arc::new(recorder.clone()))
            .build();
        let service = Arc::new(service);

        for player in &self.players {
            let nickname = capitalize(player);
            service
                .join_player(&self.game_id, Player::new(player.as_str(), nickname))
                .await
                .expect("joining a player should succeed");
        }

        TestSetup {
            game_id: self.game_id,
            service,
            recorder,
            players: self.players,
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
