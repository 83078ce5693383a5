use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::event::EventBus;
use crate::leaderboard::{LeaderboardError, LeaderboardService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub leaderboards: Arc<LeaderboardService>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(leaderboards: Arc<LeaderboardService>) -> Self {
        let event_bus = leaderboards.event_bus().clone();
        Self {
            leaderboards,
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<LeaderboardError> for AppError {
    fn from(err: LeaderboardError) -> Self {
        match err {
            LeaderboardError::GameNotFound(_) | LeaderboardError::PlayerNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            LeaderboardError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
