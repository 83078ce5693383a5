use async_trait::async_trait;
use thiserror::Error;

use super::events::LeaderboardEvent;

/// Errors that can occur when handling leaderboard events
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler error: {0}")]
    Handler(String),
}

/// Trait for components that react to a game's leaderboard events
///
/// Handlers sit downstream of the engine: toasts, confetti, socket fan-out.
/// A failing handler is logged and skipped; it never blocks scoring.
#[async_trait]
pub trait LeaderboardEventHandler: Send + Sync {
    async fn handle_event(&self, game_id: &str, event: LeaderboardEvent) -> Result<(), EventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
