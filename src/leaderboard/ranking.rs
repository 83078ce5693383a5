use std::cmp::Ordering;

use super::LeaderboardEntry;

/// Strict total order over entries: higher score first, then lower
/// cumulative response time, then player id ascending.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.stats
        .total_score
        .cmp(&a.stats.total_score)
        .then_with(|| a.stats.cumulative_speed_ms.cmp(&b.stats.cumulative_speed_ms))
        .then_with(|| a.player_id().cmp(b.player_id()))
}

/// Sorts a snapshot into rank order. The result depends only on the
/// multiset of entries, never on their input order.
pub fn sort_by_rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(compare_entries);
    entries
}
