use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::event::EventBus;
use crate::shared::{AppError, AppState};

/// GET /games/:game_id/stream
/// Upgrades to a read-only WebSocket carrying the game's leaderboard events.
/// Unknown games are rejected before the upgrade so no channel is created.
pub async fn stream_events(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    state.leaderboards.engine(&game_id).await?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let event_bus = state.event_bus.clone();
    Ok(ws.on_upgrade(move |socket| forward_events(socket, game_id, event_bus)))
}

async fn forward_events(mut socket: WebSocket, game_id: String, event_bus: EventBus) {
    let mut receiver = event_bus.subscribe_to_game(&game_id).await;
    info!(game_id = %game_id, "Leaderboard stream opened");

    loop {
        tokio::select! {
            event = receiver.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(game_id = %game_id, error = %e, "Failed to serialize event");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(game_id = %game_id, skipped, "Stream lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            },

            // Inbound messages are ignored; only a close or error ends the stream
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => debug!(game_id = %game_id, "Ignoring inbound stream message"),
            },
        }
    }

    let _ = socket.send(Message::Close(None)).await;
    info!(game_id = %game_id, "Leaderboard stream closed");
}
