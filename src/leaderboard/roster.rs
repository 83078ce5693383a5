use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::Player;

/// Identities of the players in a game, keyed by player id.
///
/// Leaving the roster only drops the identity; stats are kept so a player
/// who reconnects resumes where they left off.
#[derive(Debug, Default)]
pub struct Roster {
    players: RwLock<HashMap<String, Player>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player, replacing any previous identity with the same id
    pub fn join(&self, player: Player) {
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(player.player_id.clone(), player);
    }

    pub fn leave(&self, player_id: &str) -> Option<Player> {
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(player_id)
    }

    pub fn get(&self, player_id: &str) -> Option<Player> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(player_id)
            .cloned()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(player_id)
    }

    /// Known identity for `player_id`, or a placeholder named after the id
    pub fn resolve(&self, player_id: &str) -> Player {
        self.get(player_id)
            .unwrap_or_else(|| Player::placeholder(player_id))
    }

    pub fn players(&self) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        players.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        players
    }

    pub fn len(&self) -> usize {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_replaces_existing_identity() {
        let roster = Roster::new();
        roster.join(Player::new("p1", "Ada"));
        roster.join(Player::new("p1", "Ada L."));

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("p1").unwrap().nickname, "Ada L.");
    }

    #[test]
    fn resolve_falls_back_to_placeholder() {
        let roster = Roster::new();

        let player = roster.resolve("late-joiner");

        assert_eq!(player.nickname, "late-joiner");
        assert!(!roster.contains("late-joiner"));
    }

    #[test]
    fn leave_returns_removed_player() {
        let roster = Roster::new();
        roster.join(Player::new("p1", "Ada"));

        assert_eq!(roster.leave("p1").map(|p| p.nickname), Some("Ada".to_string()));
        assert!(roster.leave("p1").is_none());
        assert!(roster.is_empty());
    }

    #[test]
    fn players_are_listed_by_id() {
        let roster = Roster::new();
        roster.join(Player::new("p2", "Bo"));
        roster.join(Player::new("p1", "Ada"));

        let ids: Vec<String> = roster.players().into_iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }
}
