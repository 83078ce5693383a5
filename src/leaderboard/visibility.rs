use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Host-controlled policy for showing the leaderboard to participants
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisibilityMode {
    #[default]
    AlwaysOn,
    Hidden,
    RevealAtEnd,
}

/// Decides whether the public view may expose entries. Never touches scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityGate {
    pub mode: VisibilityMode,
    pub game_ended: bool,
}

impl VisibilityGate {
    pub fn new(mode: VisibilityMode) -> Self {
        Self {
            mode,
            game_ended: false,
        }
    }

    pub fn allows(&self) -> bool {
        match self.mode {
            VisibilityMode::AlwaysOn => true,
            VisibilityMode::Hidden => false,
            VisibilityMode::RevealAtEnd => self.game_ended,
        }
    }
}
