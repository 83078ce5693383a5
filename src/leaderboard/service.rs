use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::event::{EventBus, GameSubscription, LeaderboardEvent, LeaderboardEventHandler};

use super::{
    calculators::{ScoreCalculator, SpeedBonusCalculator},
    engine::{LeaderboardEngine, RankingScope},
    AnswerEvent, LeaderboardEntry, LeaderboardError, LeaderboardUpdate, Player, PlayerStats,
    ScoringConfig, ScoringConfigPatch, VisibilityGate, VisibilityMode,
};

/// Participant-facing view of a leaderboard after the visibility gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLeaderboard {
    pub visible: bool,
    pub mode: VisibilityMode,
    pub game_ended: bool,
    pub entries: Vec<LeaderboardEntry>,
}

struct GameHandle {
    engine: Arc<LeaderboardEngine>,
    gate: Mutex<VisibilityGate>,
    /// Held across rebuild + publish so cycles reach the bus in order
    publish_lock: AsyncMutex<()>,
    subscriptions: Vec<JoinHandle<()>>,
}

impl GameHandle {
    fn gate(&self) -> VisibilityGate {
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_gate(&self, f: impl FnOnce(&mut VisibilityGate)) -> VisibilityGate {
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut gate);
        *gate
    }

    fn public_view(&self) -> PublicLeaderboard {
        let gate = self.gate();
        let visible = gate.allows();
        PublicLeaderboard {
            visible,
            mode: gate.mode,
            game_ended: gate.game_ended,
            entries: if visible {
                self.engine.standings()
            } else {
                Vec::new()
            },
        }
    }
}

/// Hosts one leaderboard engine per game and publishes their results.
pub struct LeaderboardService {
    games: RwLock<HashMap<String, Arc<GameHandle>>>,
    event_bus: EventBus,
    default_config: ScoringConfig,
    default_visibility: VisibilityMode,
    scope: RankingScope,
    calculator: Arc<dyn ScoreCalculator>,
    handlers: Vec<Arc<dyn LeaderboardEventHandler>>,
}

impl LeaderboardService {
    pub fn builder(event_bus: EventBus) -> LeaderboardServiceBuilder {
        LeaderboardServiceBuilder::new(event_bus)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub async fn game_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.games.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Engine for an existing game
    pub async fn engine(&self, game_id: &str) -> Result<Arc<LeaderboardEngine>, LeaderboardError> {
        Ok(Arc::clone(&self.game(game_id).await?.engine))
    }

    #[instrument(skip(self, player), fields(player_id = %player.player_id))]
    pub async fn join_player(
        &self,
        game_id: &str,
        player: Player,
    ) -> Result<PlayerStats, LeaderboardError> {
        validate_id("player id", &player.player_id)?;
        let game = self.game_or_create(game_id).await?;

        let stats = game.engine.join_player(player.clone());
        self.event_bus
            .emit_to_game(game_id, LeaderboardEvent::PlayerJoined { player })
            .await;

        Ok(stats)
    }

    #[instrument(skip(self))]
    pub async fn leave_player(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Player, LeaderboardError> {
        let game = self.game(game_id).await?;
        let player = game
            .engine
            .leave_player(player_id)
            .ok_or_else(|| LeaderboardError::PlayerNotFound(player_id.to_string()))?;

        self.event_bus
            .emit_to_game(
                game_id,
                LeaderboardEvent::PlayerLeft {
                    player_id: player_id.to_string(),
                },
            )
            .await;

        Ok(player)
    }

    /// Scores one answer, runs a ranking cycle and publishes the result
    #[instrument(skip(self, event), fields(player_id = %event.player_id, question_id = %event.question_id))]
    pub async fn submit_answer(
        &self,
        game_id: &str,
        event: AnswerEvent,
    ) -> Result<LeaderboardUpdate, LeaderboardError> {
        self.submit_batch(game_id, vec![event]).await
    }

    /// Scores a burst of answers and publishes a single ranking cycle
    #[instrument(skip(self, events), fields(answers = events.len()))]
    pub async fn submit_batch(
        &self,
        game_id: &str,
        events: Vec<AnswerEvent>,
    ) -> Result<LeaderboardUpdate, LeaderboardError> {
        for event in &events {
            validate_id("player id", &event.player_id)?;
        }
        let game = self.game_or_create(game_id).await?;

        let mut processed = Vec::with_capacity(events.len());
        for event in &events {
            processed.push(game.engine.process_answer(event));
        }

        let _guard = game.publish_lock.lock().await;
        let update = game.engine.rebuild();

        for stats in processed {
            self.event_bus
                .emit_to_game(game_id, LeaderboardEvent::AnswerProcessed { stats })
                .await;
        }
        self.publish(game_id, &update).await;

        Ok(update)
    }

    /// Runs a ranking cycle without new answers, e.g. after roster changes
    pub async fn refresh(&self, game_id: &str) -> Result<LeaderboardUpdate, LeaderboardError> {
        let game = self.game(game_id).await?;
        let _guard = game.publish_lock.lock().await;
        let update = game.engine.rebuild();
        self.publish(game_id, &update).await;
        Ok(update)
    }

    #[instrument(skip(self))]
    pub async fn set_config(
        &self,
        game_id: &str,
        patch: ScoringConfigPatch,
    ) -> Result<ScoringConfig, LeaderboardError> {
        let game = self.game_or_create(game_id).await?;
        let config = game.engine.set_config(&patch);
        info!(game_id = %game_id, "Scoring config updated");
        Ok((*config).clone())
    }

    pub async fn config(&self, game_id: &str) -> Result<ScoringConfig, LeaderboardError> {
        let game = self.game(game_id).await?;
        Ok((*game.engine.config()).clone())
    }

    /// Host view: latest standings regardless of visibility
    pub async fn leaderboard(
        &self,
        game_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.game(game_id).await?.engine.standings())
    }

    pub async fn public_leaderboard(
        &self,
        game_id: &str,
    ) -> Result<PublicLeaderboard, LeaderboardError> {
        Ok(self.game(game_id).await?.public_view())
    }

    pub async fn player_stats(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<PlayerStats, LeaderboardError> {
        self.game(game_id)
            .await?
            .engine
            .get_player_stats(player_id)
            .ok_or_else(|| LeaderboardError::PlayerNotFound(player_id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn set_visibility(
        &self,
        game_id: &str,
        mode: VisibilityMode,
    ) -> Result<PublicLeaderboard, LeaderboardError> {
        let game = self.game_or_create(game_id).await?;
        game.update_gate(|gate| gate.mode = mode);

        self.event_bus
            .emit_to_game(game_id, LeaderboardEvent::VisibilityChanged { mode })
            .await;

        Ok(game.public_view())
    }

    #[instrument(skip(self))]
    pub async fn end_game(&self, game_id: &str) -> Result<PublicLeaderboard, LeaderboardError> {
        let game = self.game(game_id).await?;
        game.update_gate(|gate| gate.game_ended = true);

        self.event_bus
            .emit_to_game(game_id, LeaderboardEvent::GameEnded)
            .await;
        info!(game_id = %game_id, "Game ended");

        Ok(game.public_view())
    }

    /// Clears scores for a new round; roster and visibility mode are kept
    #[instrument(skip(self))]
    pub async fn reset_game(&self, game_id: &str) -> Result<(), LeaderboardError> {
        let game = self.game(game_id).await?;
        let _guard = game.publish_lock.lock().await;

        game.engine.reset();
        game.update_gate(|gate| gate.game_ended = false);

        self.event_bus
            .emit_to_game(game_id, LeaderboardEvent::GameReset)
            .await;
        info!(game_id = %game_id, "Game reset");

        Ok(())
    }

    /// Drops the game entirely and stops its subscribers
    #[instrument(skip(self))]
    pub async fn remove_game(&self, game_id: &str) -> bool {
        let removed = self.games.write().await.remove(game_id);
        match removed {
            Some(game) => {
                for task in &game.subscriptions {
                    task.abort();
                }
                self.event_bus.close_game(game_id).await;
                info!(game_id = %game_id, "Game removed");
                true
            }
            None => false,
        }
    }

    async fn publish(&self, game_id: &str, update: &LeaderboardUpdate) {
        self.event_bus
            .emit_to_game(
                game_id,
                LeaderboardEvent::RankingUpdated {
                    cycle: update.cycle,
                    entries: update.entries.clone(),
                },
            )
            .await;

        for change in &update.changes {
            self.event_bus
                .emit_to_game(game_id, LeaderboardEvent::RankChanged(change.clone()))
                .await;
        }
    }

    async fn game(&self, game_id: &str) -> Result<Arc<GameHandle>, LeaderboardError> {
        self.games
            .read()
            .await
            .get(game_id)
            .cloned()
            .ok_or_else(|| LeaderboardError::GameNotFound(game_id.to_string()))
    }

    async fn game_or_create(&self, game_id: &str) -> Result<Arc<GameHandle>, LeaderboardError> {
        validate_id("game id", game_id)?;

        {
            let games = self.games.read().await;
            if let Some(game) = games.get(game_id) {
                return Ok(Arc::clone(game));
            }
        }

        let mut games = self.games.write().await;
        if let Some(game) = games.get(game_id) {
            return Ok(Arc::clone(game));
        }

        let mut subscriptions = Vec::with_capacity(self.handlers.len());
        for handler in &self.handlers {
            let subscription = GameSubscription::new(
                game_id.to_string(),
                Arc::clone(handler),
                self.event_bus.clone(),
            );
            subscriptions.push(subscription.start().await);
        }

        let engine = LeaderboardEngine::builder()
            .with_config(self.default_config.clone())
            .with_calculator(Arc::clone(&self.calculator))
            .with_scope(self.scope)
            .build();

        let game = Arc::new(GameHandle {
            engine: Arc::new(engine),
            gate: Mutex::new(VisibilityGate::new(self.default_visibility)),
            publish_lock: AsyncMutex::new(()),
            subscriptions,
        });
        games.insert(game_id.to_string(), Arc::clone(&game));

        debug!(game_id = %game_id, "Created leaderboard for game");
        Ok(game)
    }
}

fn validate_id(kind: &str, id: &str) -> Result<(), LeaderboardError> {
    if id.trim().is_empty() {
        return Err(LeaderboardError::Validation(format!("{kind} must not be empty")));
    }
    Ok(())
}

pub struct LeaderboardServiceBuilder {
    event_bus: EventBus,
    default_config: ScoringConfig,
    default_visibility: VisibilityMode,
    scope: RankingScope,
    calculator: Arc<dyn ScoreCalculator>,
    handlers: Vec<Arc<dyn LeaderboardEventHandler>>,
}

impl LeaderboardServiceBuilder {
    fn new(event_bus: EventBus) -> Self {
        Self {
            event_bus,
            default_config: ScoringConfig::default(),
            default_visibility: VisibilityMode::default(),
            scope: RankingScope::default(),
            calculator: Arc::new(SpeedBonusCalculator::new()),
            handlers: Vec::new(),
        }
    }

    pub fn with_default_config(mut self, config: ScoringConfig) -> Self {
        self.default_config = config;
        self
    }

    pub fn with_default_visibility(mut self, mode: VisibilityMode) -> Self {
        self.default_visibility = mode;
        self
    }

    pub fn with_scope(mut self, scope: RankingScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn ScoreCalculator>) -> Self {
        self.calculator = calculator;
        self
    }

    /// Subscribes `handler` to every game this service creates
    pub fn with_handler(mut self, handler: Arc<dyn LeaderboardEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> LeaderboardService {
        LeaderboardService {
            games: RwLock::new(HashMap::new()),
            event_bus: self.event_bus,
            default_config: self.default_config,
            default_visibility: self.default_visibility,
            scope: self.scope,
            calculator: self.calculator,
            handlers: self.handlers,
        }
    }
}
