use std::collections::HashMap;

use super::{LeaderboardEntry, RankChangeEvent};

/// Compares two ordered snapshots and reports every player whose position
/// moved. Ranks are taken from list position (index + 1).
///
/// Players absent from `previous` are treated as unmoved; players absent
/// from `next` are ignored. Events come out in `next` order.
pub fn compute_rank_changes(
    previous: &[LeaderboardEntry],
    next: &[LeaderboardEntry],
) -> Vec<RankChangeEvent> {
    let mut old_positions: HashMap<&str, (u32, u32)> = HashMap::with_capacity(previous.len());
    for (index, entry) in previous.iter().enumerate() {
        old_positions
            .entry(entry.player_id())
            .or_insert((index as u32 + 1, entry.stats.total_score));
    }

    next.iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let new_rank = index as u32 + 1;
            let (old_rank, old_score) = old_positions
                .get(entry.player_id())
                .copied()
                .unwrap_or((new_rank, entry.stats.total_score));

            if old_rank == new_rank {
                return None;
            }

            Some(RankChangeEvent {
                player_id: entry.player_id().to_string(),
                nickname: entry.player.nickname.clone(),
                old_rank,
                new_rank,
                rank_delta: old_rank as i32 - new_rank as i32,
                score_delta: (i64::from(entry.stats.total_score) - i64::from(old_score)) as i32,
                became_champion: new_rank == 1 && old_rank != 1,
                entered_top3: new_rank <= 3 && old_rank > 3,
            })
        })
        .collect()
}
