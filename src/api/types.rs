use serde::{Deserialize, Serialize};

use crate::leaderboard::VisibilityMode;

/// Request payload for setting the leaderboard visibility mode
#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub mode: VisibilityMode,
}

/// Response listing the games currently hosted
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesResponse {
    pub game_ids: Vec<String>,
}
