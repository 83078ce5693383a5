use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{GamesResponse, VisibilityRequest};
use crate::leaderboard::{
    AnswerEvent, LeaderboardEntry, LeaderboardUpdate, Player, PlayerStats, PublicLeaderboard,
    ScoringConfig, ScoringConfigPatch,
};
use crate::shared::{AppError, AppState};

/// GET /games
#[instrument(name = "list_games", skip(state))]
pub async fn list_games(State(state): State<AppState>) -> Json<GamesResponse> {
    Json(GamesResponse {
        game_ids: state.leaderboards.game_ids().await,
    })
}

/// POST /games/:game_id/players
/// Adds the player to the roster with zeroed stats
#[instrument(name = "join_player", skip(state, player), fields(player_id = %player.player_id))]
pub async fn join_player(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(player): Json<Player>,
) -> Result<Json<PlayerStats>, AppError> {
    let stats = state.leaderboards.join_player(&game_id, player).await?;
    info!(game_id = %game_id, player_id = %stats.player_id, "Player joined game");
    Ok(Json(stats))
}

/// DELETE /games/:game_id/players/:player_id
#[instrument(name = "leave_player", skip(state))]
pub async fn leave_player(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(String, String)>,
) -> Result<Json<Player>, AppError> {
    let player = state.leaderboards.leave_player(&game_id, &player_id).await?;
    Ok(Json(player))
}

/// GET /games/:game_id/players/:player_id/stats
#[instrument(name = "player_stats", skip(state))]
pub async fn player_stats(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(String, String)>,
) -> Result<Json<PlayerStats>, AppError> {
    let stats = state.leaderboards.player_stats(&game_id, &player_id).await?;
    Ok(Json(stats))
}

/// POST /games/:game_id/answers
/// Scores one answer and returns the resulting ranking cycle
#[instrument(name = "submit_answer", skip(state, event), fields(player_id = %event.player_id))]
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(event): Json<AnswerEvent>,
) -> Result<Json<LeaderboardUpdate>, AppError> {
    let update = state.leaderboards.submit_answer(&game_id, event).await?;
    Ok(Json(update))
}

/// POST /games/:game_id/answers/batch
/// Scores a burst of answers with a single ranking cycle
#[instrument(name = "submit_batch", skip(state, events), fields(answers = events.len()))]
pub async fn submit_batch(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(events): Json<Vec<AnswerEvent>>,
) -> Result<Json<LeaderboardUpdate>, AppError> {
    if events.is_empty() {
        return Err(AppError::BadRequest(
            "batch must contain at least one answer".to_string(),
        ));
    }

    let update = state.leaderboards.submit_batch(&game_id, events).await?;
    Ok(Json(update))
}

/// GET /games/:game_id/leaderboard
/// Participant view, subject to the visibility mode
#[instrument(name = "public_leaderboard", skip(state))]
pub async fn public_leaderboard(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<PublicLeaderboard>, AppError> {
    Ok(Json(state.leaderboards.public_leaderboard(&game_id).await?))
}

/// GET /games/:game_id/leaderboard/host
#[instrument(name = "host_leaderboard", skip(state))]
pub async fn host_leaderboard(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    Ok(Json(state.leaderboards.leaderboard(&game_id).await?))
}

/// GET /games/:game_id/config
#[instrument(name = "get_config", skip(state))]
pub async fn get_config(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<ScoringConfig>, AppError> {
    Ok(Json(state.leaderboards.config(&game_id).await?))
}

/// PATCH /games/:game_id/config
/// Merges the given fields into the active config
#[instrument(name = "update_config", skip(state))]
pub async fn update_config(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(patch): Json<ScoringConfigPatch>,
) -> Result<Json<ScoringConfig>, AppError> {
    Ok(Json(state.leaderboards.set_config(&game_id, patch).await?))
}

/// PUT /games/:game_id/visibility
#[instrument(name = "set_visibility", skip(state))]
pub async fn set_visibility(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<VisibilityRequest>,
) -> Result<Json<PublicLeaderboard>, AppError> {
    info!(game_id = %game_id, mode = %request.mode, "Changing leaderboard visibility");
    Ok(Json(
        state
            .leaderboards
            .set_visibility(&game_id, request.mode)
            .await?,
    ))
}

/// POST /games/:game_id/end
#[instrument(name = "end_game", skip(state))]
pub async fn end_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<PublicLeaderboard>, AppError> {
    Ok(Json(state.leaderboards.end_game(&game_id).await?))
}

/// POST /games/:game_id/reset
#[instrument(name = "reset_game", skip(state))]
pub async fn reset_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.leaderboards.reset_game(&game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
