use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{bus::EventBus, handler::LeaderboardEventHandler};

/// Routes one game's events to a handler on a background task
pub struct GameSubscription {
    game_id: String,
    handler: Arc<dyn LeaderboardEventHandler>,
    event_bus: EventBus,
}

impl GameSubscription {
    pub fn new(game_id: String, handler: Arc<dyn LeaderboardEventHandler>, event_bus: EventBus) -> Self {
        Self {
            game_id,
            handler,
            event_bus,
        }
    }

    /// Subscribes immediately, then spawns the forwarding task. Events
    /// emitted after this returns are guaranteed to reach the handler.
    pub async fn start(self) -> JoinHandle<()> {
        let game_id = self.game_id;
        let handler = self.handler;
        let handler_name = handler.handler_name();

        info!(
            game_id = %game_id,
            handler = handler_name,
            "Starting game subscription"
        );

        let mut receiver = self.event_bus.subscribe_to_game(&game_id).await;

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        debug!(
                            game_id = %game_id,
                            handler = handler_name,
                            event_type = event.event_type(),
                            "Received leaderboard event"
                        );

                        if let Err(e) = handler.handle_event(&game_id, event).await {
                            warn!(
                                game_id = %game_id,
                                handler = handler_name,
                                error = %e,
                                "Leaderboard event handler failed"
                            );
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            game_id = %game_id,
                            handler = handler_name,
                            skipped,
                            "Subscriber lagged, events dropped"
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            info!(
                game_id = %game_id,
                handler = handler_name,
                "Game subscription ended - no more events"
            );
        })
    }
}
