use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{calculators::ScoreDelta, PlayerStats};

/// Authoritative per-player statistics for one game.
///
/// Every method is a short critical section with no I/O, so implementations
/// use blocking locks and can be called from async code directly.
pub trait PlayerStatsStore: Send + Sync {
    /// Creates zeroed stats if absent. Existing stats are returned unchanged.
    fn initialize(&self, player_id: &str) -> PlayerStats;

    /// Atomically folds `delta` into the player's record, creating it if needed
    fn apply(&self, player_id: &str, delta: &ScoreDelta, answered_at: DateTime<Utc>)
        -> PlayerStats;

    fn get_stats(&self, player_id: &str) -> Option<PlayerStats>;

    fn all_stats(&self) -> Vec<PlayerStats>;

    /// Writes rank assignments for many players under a single lock
    fn record_ranks(&self, ranks: &[(String, u32)]);

    fn reset(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPlayerStatsStore {
    players: RwLock<HashMap<String, PlayerStats>>,
}

impl InMemoryPlayerStatsStore {
    pub fn new() -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
        }
    }

    // Records are only mutated through PlayerStats methods; a poisoned lock
    // still holds whole records.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PlayerStats>> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PlayerStats>> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlayerStatsStore for InMemoryPlayerStatsStore {
    fn initialize(&self, player_id: &str) -> PlayerStats {
        let mut players = self.write();
        players
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerStats::new(player_id))
            .clone()
    }

    fn apply(
        &self,
        player_id: &str,
        delta: &ScoreDelta,
        answered_at: DateTime<Utc>,
    ) -> PlayerStats {
        let mut players = self.write();
        let stats = players
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerStats::new(player_id));

        stats.record_answer(delta, answered_at);
        stats.clone()
    }

    fn get_stats(&self, player_id: &str) -> Option<PlayerStats> {
        self.read().get(player_id).cloned()
    }

    fn all_stats(&self) -> Vec<PlayerStats> {
        self.read().values().cloned().collect()
    }

    fn record_ranks(&self, ranks: &[(String, u32)]) {
        let mut players = self.write();
        for (player_id, rank) in ranks {
            if let Some(stats) = players.get_mut(player_id) {
                stats.assign_rank(*rank);
            }
        }
    }

    fn reset(&self) {
        self.write().clear();
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}
