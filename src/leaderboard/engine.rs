use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, trace};

use super::{
    calculators::{ScoreCalculator, SpeedBonusCalculator},
    diff, highlights, ranking,
    repository::{InMemoryPlayerStatsStore, PlayerStatsStore},
    roster::Roster,
    AnswerEvent, LeaderboardEntry, LeaderboardUpdate, Player, PlayerStats, RankChangeEvent,
    ScoringConfig, ScoringConfigPatch,
};

/// Which players take part in a ranking cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingScope {
    /// Everyone with stats, including players who left the roster
    #[default]
    AllPlayers,
    /// Only players currently on the roster
    RosterOnly,
}

#[derive(Debug, Default)]
struct RankingCycle {
    number: u64,
    /// Last official ordering; the "before" side of the next diff
    baseline: Vec<LeaderboardEntry>,
}

/// Live scoring and ranking for a single game.
///
/// Answers mutate one player's stats at a time and may arrive from any
/// number of tasks. Ranking cycles are serialized, so every diff is taken
/// between two consistent snapshots.
pub struct LeaderboardEngine {
    calculator: Arc<dyn ScoreCalculator>,
    store: Arc<dyn PlayerStatsStore>,
    roster: Roster,
    config: RwLock<Arc<ScoringConfig>>,
    scope: RankingScope,
    cycle: Mutex<RankingCycle>,
    active: Mutex<HashSet<String>>,
}

impl Default for LeaderboardEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LeaderboardEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self::builder().with_config(config).build()
    }

    pub fn builder() -> LeaderboardEngineBuilder {
        LeaderboardEngineBuilder::new()
    }

    /// Currently active config. Callers keep a consistent copy even if it
    /// is replaced mid-use.
    pub fn config(&self) -> Arc<ScoringConfig> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merges `patch` into the active config. Only affects later answers.
    pub fn set_config(&self, patch: &ScoringConfigPatch) -> Arc<ScoringConfig> {
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let merged = Arc::new(guard.merged(patch));
        *guard = Arc::clone(&merged);
        debug!(config = ?merged, "Scoring config updated");
        merged
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn initialize_player(&self, player_id: &str) -> PlayerStats {
        self.store.initialize(player_id)
    }

    /// Adds the player to the roster and gives them zeroed stats
    pub fn join_player(&self, player: Player) -> PlayerStats {
        let stats = self.store.initialize(&player.player_id);
        debug!(player_id = %player.player_id, nickname = %player.nickname, "Player joined");
        self.roster.join(player);
        stats
    }

    /// Removes the player's identity; their stats stay in the store
    pub fn leave_player(&self, player_id: &str) -> Option<Player> {
        let removed = self.roster.leave(player_id);
        if removed.is_some() {
            debug!(player_id = %player_id, "Player left");
        }
        removed
    }

    /// Scores one answer and folds it into the player's stats.
    ///
    /// Unknown players are created on the fly. Ranks are not touched; call
    /// [`Self::rebuild`] (or sort, diff and [`Self::update_ranks`]) afterwards,
    /// once per burst of answers.
    pub fn process_answer(&self, event: &AnswerEvent) -> PlayerStats {
        let config = self.config();
        let delta = self.calculator.calculate(event, &config);

        // Any cycle that sees the new stats must also see the player as active
        self.lock_active().insert(event.player_id.clone());
        let stats = self.store.apply(&event.player_id, &delta, event.timestamp);

        trace!(
            player_id = %event.player_id,
            question_id = %event.question_id,
            calculator = self.calculator.name(),
            is_correct = event.is_correct,
            raw_delta = delta.raw_delta,
            applied_delta = stats.last_score_delta,
            total_score = stats.total_score,
            "Answer processed"
        );

        stats
    }

    pub fn sort_by_rank(&self, entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
        ranking::sort_by_rank(entries)
    }

    pub fn compute_rank_changes(
        &self,
        previous: &[LeaderboardEntry],
        next: &[LeaderboardEntry],
    ) -> Vec<RankChangeEvent> {
        diff::compute_rank_changes(previous, next)
    }

    /// Assigns ranks 1..=N from list position, both on the given entries and
    /// in the store. `entries` must already be sorted.
    pub fn update_ranks(&self, entries: &mut [LeaderboardEntry]) {
        let mut assignments = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter_mut().enumerate() {
            let rank = index as u32 + 1;
            entry.stats.assign_rank(rank);
            assignments.push((entry.stats.player_id.clone(), rank));
        }
        self.store.record_ranks(&assignments);
    }

    /// Unsorted snapshot of every rankable player, copied under the store lock
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.store
            .all_stats()
            .into_iter()
            .filter(|stats| match self.scope {
                RankingScope::AllPlayers => true,
                RankingScope::RosterOnly => self.roster.contains(&stats.player_id),
            })
            .map(|stats| LeaderboardEntry::new(self.roster.resolve(&stats.player_id), stats))
            .collect()
    }

    /// Runs one full ranking cycle: snapshot, sort, diff against the previous
    /// official ordering, assign ranks and annotate highlights.
    pub fn rebuild(&self) -> LeaderboardUpdate {
        let mut cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        let active = std::mem::take(&mut *self.lock_active());
        let config = self.config();

        let mut entries = self.sort_by_rank(self.entries());
        let changes = self.compute_rank_changes(&cycle.baseline, &entries);
        self.update_ranks(&mut entries);
        highlights::annotate(&mut entries, &changes, &active, &config);

        cycle.number += 1;
        cycle.baseline = entries.clone();

        debug!(
            cycle = cycle.number,
            players = entries.len(),
            rank_changes = changes.len(),
            "Leaderboard rebuilt"
        );

        LeaderboardUpdate {
            cycle: cycle.number,
            entries,
            changes,
        }
    }

    /// Ordering produced by the most recent [`Self::rebuild`]
    pub fn standings(&self) -> Vec<LeaderboardEntry> {
        self.cycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .baseline
            .clone()
    }

    pub fn cycle_number(&self) -> u64 {
        self.cycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .number
    }

    pub fn get_all_stats(&self) -> Vec<PlayerStats> {
        self.store.all_stats()
    }

    pub fn get_player_stats(&self, player_id: &str) -> Option<PlayerStats> {
        self.store.get_stats(player_id)
    }

    /// Starts a new game: clears stats and ranking history, keeps the roster
    pub fn reset(&self) {
        let mut cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.reset();
        self.lock_active().clear();
        *cycle = RankingCycle::default();
        debug!("Leaderboard reset");
    }

    fn lock_active(&self) -> MutexGuard<'_, HashSet<String>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct LeaderboardEngineBuilder {
    config: ScoringConfig,
    calculator: Arc<dyn ScoreCalculator>,
    store: Arc<dyn PlayerStatsStore>,
    scope: RankingScope,
}

impl LeaderboardEngineBuilder {
    fn new() -> Self {
        Self {
            config: ScoringConfig::default(),
            calculator: Arc::new(SpeedBonusCalculator::new()),
            store: Arc::new(InMemoryPlayerStatsStore::new()),
            scope: RankingScope::default(),
        }
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn ScoreCalculator>) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn PlayerStatsStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_scope(mut self, scope: RankingScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn build(self) -> LeaderboardEngine {
        LeaderboardEngine {
            calculator: self.calculator,
            store: self.store,
            roster: Roster::new(),
            config: RwLock::new(Arc::new(self.config)),
            scope: self.scope,
            cycle: Mutex::new(RankingCycle::default()),
            active: Mutex::new(HashSet::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::calculators::{ScoreDelta, StreakChange};
    use crate::leaderboard::HighlightType;
    use chrono::{DateTime, Utc};
    use std::sync::{OnceLock, Weak};

    fn engine() -> LeaderboardEngine {
        LeaderboardEngine::new(ScoringConfig {
            base_points_correct: 100,
            speed_bonus_max: 60,
            wrong_answer_penalty: 10,
            max_answer_time_ms: 30_000,
            ..ScoringConfig::default()
        })
    }

    fn answer(player_id: &str, is_correct: bool, time: u64) -> AnswerEvent {
        AnswerEvent::new(player_id, "q1", is_correct, time)
    }

    struct FlatCalculator;

    impl ScoreCalculator for FlatCalculator {
        fn calculate(&self, event: &AnswerEvent, _config: &ScoringConfig) -> ScoreDelta {
            ScoreDelta {
                is_correct: event.is_correct,
                raw_delta: 1,
                clamped_response_time_ms: event.response_time_ms,
                streak: StreakChange::Increment,
            }
        }

        fn name(&self) -> &'static str {
            "FlatCalculator"
        }
    }

    /// Runs a ranking cycle from inside `apply`, right after the stats change
    #[derive(Default)]
    struct RebuildingStore {
        inner: InMemoryPlayerStatsStore,
        engine: OnceLock<Weak<LeaderboardEngine>>,
        update: Mutex<Option<LeaderboardUpdate>>,
    }

    impl PlayerStatsStore for RebuildingStore {
        fn initialize(&self, player_id: &str) -> PlayerStats {
            self.inner.initialize(player_id)
        }

        fn apply(
            &self,
            player_id: &str,
            delta: &ScoreDelta,
            answered_at: DateTime<Utc>,
        ) -> PlayerStats {
            let stats = self.inner.apply(player_id, delta, answered_at);
            if let Some(engine) = self.engine.get().and_then(Weak::upgrade) {
                *self.update.lock().unwrap() = Some(engine.rebuild());
            }
            stats
        }

        fn get_stats(&self, player_id: &str) -> Option<PlayerStats> {
            self.inner.get_stats(player_id)
        }

        fn all_stats(&self) -> Vec<PlayerStats> {
            self.inner.all_stats()
        }

        fn record_ranks(&self, ranks: &[(String, u32)]) {
            self.inner.record_ranks(ranks)
        }

        fn reset(&self) {
            self.inner.reset()
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn cycle_seeing_an_answer_also_sees_the_player_as_active() {
        let store = Arc::new(RebuildingStore::default());
        let engine = Arc::new(
            LeaderboardEngine::builder()
                .with_store(store.clone())
                .build(),
        );
        store.engine.set(Arc::downgrade(&engine)).ok();

        engine.process_answer(&answer("p1", true, 1_000));

        let update = store.update.lock().unwrap().take().unwrap();
        assert_eq!(update.entries[0].stats.total_answered, 1);
        assert_eq!(update.entries[0].highlight_type, Some(HighlightType::Fast));

        let next = engine.rebuild();
        assert!(!next.entries[0].is_highlighted);
    }

    #[test]
    fn process_answer_scores_correct_then_wrong() {
        let engine = engine();

        let first = engine.process_answer(&answer("p1", true, 3_000));
        assert_eq!(first.total_score, 154);

        let second = engine.process_answer(&answer("p1", false, 3_000));
        assert_eq!(second.total_score, 144);
        assert_eq!(second.streak_correct, 0);
        assert_eq!(second.last_score_delta, -10);
    }

    #[test]
    fn set_config_applies_to_later_answers_only() {
        let engine = engine();
        engine.process_answer(&answer("p1", true, 30_000));

        engine.set_config(&ScoringConfigPatch {
            base_points_correct: Some(500),
            ..ScoringConfigPatch::default()
        });
        let stats = engine.process_answer(&answer("p1", true, 30_000));

        assert_eq!(stats.total_score, 600);
        assert_eq!(engine.config().speed_bonus_max, 60);
    }

    #[test]
    fn custom_calculator_is_used() {
        let engine = LeaderboardEngine::builder()
            .with_calculator(Arc::new(FlatCalculator))
            .build();

        let stats = engine.process_answer(&answer("p1", true, 100));

        assert_eq!(stats.total_score, 1);
    }

    #[test]
    fn update_ranks_assigns_dense_ranks_and_persists_them() {
        let engine = engine();
        engine.process_answer(&answer("p1", true, 10_000));
        engine.process_answer(&answer("p2", true, 1_000));
        engine.initialize_player("p3");

        let mut entries = engine.sort_by_rank(engine.entries());
        engine.update_ranks(&mut entries);

        let ranks: Vec<(String, u32)> = entries
            .iter()
            .map(|e| (e.player_id().to_string(), e.rank()))
            .collect();
        assert_eq!(
            ranks,
            vec![
                ("p2".to_string(), 1),
                ("p1".to_string(), 2),
                ("p3".to_string(), 3)
            ]
        );
        assert_eq!(engine.get_player_stats("p1").unwrap().current_rank, 2);
    }

    #[test]
    fn rebuild_reports_overtakes_against_previous_cycle() {
        let engine = engine();
        engine.join_player(Player::new("p1", "Ada"));
        engine.join_player(Player::new("p2", "Bo"));
        engine.process_answer(&answer("p1", true, 0));
        let first = engine.rebuild();

        assert_eq!(first.cycle, 1);
        assert!(first.changes.is_empty());
        assert_eq!(first.entries[0].player.nickname, "Ada");

        engine.process_answer(&answer("p2", true, 0));
        engine.process_answer(&answer("p2", true, 0));
        let second = engine.rebuild();

        assert_eq!(second.cycle, 2);
        assert_eq!(second.changes.len(), 2);
        let champion = &second.changes[0];
        assert_eq!(champion.player_id, "p2");
        assert_eq!(champion.nickname, "Bo");
        assert!(champion.became_champion);
        assert_eq!(champion.score_delta, 320);
        assert_eq!(second.entries[0].highlight_type, Some(HighlightType::Champion));

        let p1 = engine.get_player_stats("p1").unwrap();
        assert_eq!((p1.previous_rank, p1.current_rank, p1.last_delta_rank), (1, 2, -1));
    }

    #[test]
    fn rebuild_without_answers_changes_nothing() {
        let engine = engine();
        engine.process_answer(&answer("p1", true, 0));
        engine.process_answer(&answer("p2", true, 100));
        engine.rebuild();

        let again = engine.rebuild();

        assert!(again.changes.is_empty());
        assert!(again.entries.iter().all(|e| !e.is_highlighted));
    }

    #[test]
    fn roster_only_scope_excludes_departed_players() {
        let engine = LeaderboardEngine::builder()
            .with_scope(RankingScope::RosterOnly)
            .build();
        engine.join_player(Player::new("p1", "Ada"));
        engine.join_player(Player::new("p2", "Bo"));
        engine.process_answer(&answer("p1", true, 0));

        engine.leave_player("p1");
        let update = engine.rebuild();

        assert_eq!(update.entries.len(), 1);
        assert_eq!(update.entries[0].player_id(), "p2");
        assert!(engine.get_player_stats("p1").is_some());
    }

    #[test]
    fn late_joiner_gets_placeholder_identity() {
        let engine = engine();
        engine.process_answer(&answer("ghost", true, 0));

        let update = engine.rebuild();

        assert_eq!(update.entries[0].player.nickname, "ghost");
    }

    #[test]
    fn reset_clears_stats_and_history_but_keeps_roster() {
        let engine = engine();
        engine.join_player(Player::new("p1", "Ada"));
        engine.process_answer(&answer("p1", true, 0));
        engine.rebuild();

        engine.reset();

        assert!(engine.get_all_stats().is_empty());
        assert!(engine.standings().is_empty());
        assert_eq!(engine.cycle_number(), 0);
        assert!(engine.roster().contains("p1"));
    }

    #[test]
    fn concurrent_answers_then_rebuild_yield_dense_ranks() {
        let engine = Arc::new(engine());

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for question in 0..50 {
                        let player = format!("p{}", (worker * 50 + question) % 10);
                        engine.process_answer(&answer(&player, question % 3 != 0, 1_000));
                        if question % 10 == 0 {
                            engine.rebuild();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let update = engine.rebuild();
        let ranks: Vec<u32> = update.entries.iter().map(|e| e.rank()).collect();
        assert_eq!(ranks, (1..=10).collect::<Vec<u32>>());

        let answered: u32 = engine.get_all_stats().iter().map(|s| s.total_answered).sum();
        assert_eq!(answered, 200);
    }
}
