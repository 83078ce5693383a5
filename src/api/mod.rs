pub mod handlers;
pub mod stream;
pub mod types;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;

/// Builds the HTTP surface over the leaderboard service
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Quiz leaderboard" }))
        .route("/games", get(handlers::list_games))
        .route("/games/:game_id/players", post(handlers::join_player))
        .route(
            "/games/:game_id/players/:player_id",
            delete(handlers::leave_player),
        )
        .route(
            "/games/:game_id/players/:player_id/stats",
            get(handlers::player_stats),
        )
        .route("/games/:game_id/answers", post(handlers::submit_answer))
        .route("/games/:game_id/answers/batch", post(handlers::submit_batch))
        .route("/games/:game_id/leaderboard", get(handlers::public_leaderboard))
        .route(
            "/games/:game_id/leaderboard/host",
            get(handlers::host_leaderboard),
        )
        .route(
            "/games/:game_id/config",
            get(handlers::get_config).patch(handlers::update_config),
        )
        .route("/games/:game_id/visibility", put(handlers::set_visibility))
        .route("/games/:game_id/end", post(handlers::end_game))
        .route("/games/:game_id/reset", post(handlers::reset_game))
        .route("/games/:game_id/stream", get(stream::stream_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
