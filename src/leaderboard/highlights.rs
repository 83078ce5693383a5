use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum_macros::{Display, EnumString};

use super::{LeaderboardEntry, PlayerStats, RankChangeEvent, ScoringConfig};

/// Hint for how the presentation layer might call out a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HighlightType {
    Champion,
    TopThree,
    RankJump,
    Dropped,
    Streak,
    Fast,
    Slow,
}

/// Picks at most one highlight for a player, strongest first.
pub fn classify(
    stats: &PlayerStats,
    change: Option<&RankChangeEvent>,
    config: &ScoringConfig,
) -> Option<HighlightType> {
    if let Some(change) = change {
        let jump = config.rank_jump_threshold.max(1) as i32;
        if change.became_champion {
            return Some(HighlightType::Champion);
        }
        if change.entered_top3 {
            return Some(HighlightType::TopThree);
        }
        if change.rank_delta >= jump {
            return Some(HighlightType::RankJump);
        }
        if change.rank_delta <= -jump {
            return Some(HighlightType::Dropped);
        }
    }

    if stats.total_answered == 0 {
        return None;
    }

    if stats.last_answer_was_correct {
        if config.streak_threshold > 0 && stats.streak_correct >= config.streak_threshold {
            return Some(HighlightType::Streak);
        }
        if stats.last_response_time_ms <= config.fast_threshold_ms {
            return Some(HighlightType::Fast);
        }
    }

    if stats.last_response_time_ms >= config.slow_threshold_ms {
        return Some(HighlightType::Slow);
    }

    None
}

/// Sets the presentation flags on a ranked snapshot.
///
/// Only players in `active` (answered since the last cycle) or with a rank
/// change are considered; everyone else is cleared.
pub fn annotate(
    entries: &mut [LeaderboardEntry],
    changes: &[RankChangeEvent],
    active: &HashSet<String>,
    config: &ScoringConfig,
) {
    let by_player: HashMap<&str, &RankChangeEvent> = changes
        .iter()
        .map(|change| (change.player_id.as_str(), change))
        .collect();

    for entry in entries.iter_mut() {
        let change = by_player.get(entry.player_id()).copied();
        let highlight = if change.is_some() || active.contains(entry.player_id()) {
            classify(&entry.stats, change, config)
        } else {
            None
        };

        entry.highlight_type = highlight;
        entry.is_highlighted = highlight.is_some();
        entry.show_delta_label = entry.stats.last_delta_rank != 0;
    }
}
