use async_trait::async_trait;
use tracing::info;

use super::{EventError, LeaderboardEvent, LeaderboardEventHandler};

/// Logs the transitions a presentation layer would celebrate
#[derive(Debug, Default, Clone, Copy)]
pub struct CelebrationLogger;

#[async_trait]
impl LeaderboardEventHandler for CelebrationLogger {
    async fn handle_event(&self, game_id: &str, event: LeaderboardEvent) -> Result<(), EventError> {
        match event {
            LeaderboardEvent::RankChanged(change) if change.became_champion => {
                info!(
                    game_id = %game_id,
                    player_id = %change.player_id,
                    nickname = %change.nickname,
                    old_rank = change.old_rank,
                    "New leader"
                );
            }
            LeaderboardEvent::RankChanged(change) if change.entered_top3 => {
                info!(
                    game_id = %game_id,
                    player_id = %change.player_id,
                    nickname = %change.nickname,
                    new_rank = change.new_rank,
                    "Entered the top three"
                );
            }
            LeaderboardEvent::GameEnded => {
                info!(game_id = %game_id, "Game ended");
            }
            _ => {}
        }

        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "CelebrationLogger"
    }
}
