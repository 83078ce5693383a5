use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use quiz_leaderboard::event::{EventError, LeaderboardEvent, LeaderboardEventHandler};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Captures every event delivered to it, per game
#[derive(Clone, Default)]
pub struct RecordingHandler {
    events: Arc<RwLock<Vec<(String, LeaderboardEvent)>>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events_for(&self, game_id: &str) -> Vec<LeaderboardEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|(game, _)| game == game_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub async fn event_types_for(&self, game_id: &str) -> Vec<&'static str> {
        self.events_for(game_id)
            .await
            .iter()
            .map(|event| event.event_type())
            .collect()
    }

    /// Polls until at least `count` events arrived for the game
    pub async fn wait_for(&self, game_id: &str, count: usize) -> Vec<LeaderboardEvent> {
        for _ in 0..100 {
            let events = self.events_for(game_id).await;
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        self.events_for(game_id).await
    }
}

#[async_trait]
impl LeaderboardEventHandler for RecordingHandler {
    async fn handle_event(&self, game_id: &str, event: LeaderboardEvent) -> Result<(), EventError> {
        self.events
            .write()
            .await
            .push((game_id.to_string(), event));
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "RecordingHandler"
    }
}
