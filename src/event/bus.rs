use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::LeaderboardEvent;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Event bus for distributing leaderboard events, one channel per game
#[derive(Debug, Clone)]
pub struct EventBus {
    /// game_id -> sender
    game_channels: Arc<RwLock<HashMap<String, broadcast::Sender<LeaderboardEvent>>>>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl EventBus {
    /// Creates a new event bus; `capacity` is the per-game buffer size
    pub fn new(capacity: usize) -> Self {
        Self {
            game_channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Emits an event to all subscribers of a specific game
    pub async fn emit_to_game(&self, game_id: &str, event: LeaderboardEvent) {
        let sender = self.sender(game_id).await;
        let event_type = event.event_type();

        match sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    game_id = %game_id,
                    event_type,
                    receivers = receiver_count,
                    "Leaderboard event emitted"
                );
            }
            Err(_) => {
                debug!(game_id = %game_id, event_type, "Leaderboard event emitted with no receivers");
            }
        }
    }

    /// Subscribe to events for a specific game
    pub async fn subscribe_to_game(&self, game_id: &str) -> broadcast::Receiver<LeaderboardEvent> {
        self.sender(game_id).await.subscribe()
    }

    /// Drops the game's channel; live receivers see the stream close
    pub async fn close_game(&self, game_id: &str) {
        let mut game_channels = self.game_channels.write().await;
        if game_channels.remove(game_id).is_some() {
            debug!(game_id = %game_id, "Game channel closed");
        }
    }

    /// Number of games that currently have a channel
    pub async fn channel_count(&self) -> usize {
        self.game_channels.read().await.len()
    }

    async fn sender(&self, game_id: &str) -> broadcast::Sender<LeaderboardEvent> {
        {
            let game_channels = self.game_channels.read().await;
            if let Some(sender) = game_channels.get(game_id) {
                return sender.clone();
            }
        }

        debug!(game_id = %game_id, "Creating new game channel");
        let mut game_channels = self.game_channels.write().await;
        game_channels
            .entry(game_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}
