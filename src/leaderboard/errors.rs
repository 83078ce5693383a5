use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
