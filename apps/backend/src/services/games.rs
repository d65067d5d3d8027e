//! In-process registry of running games.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::ai::{by_name, DecisionService, FactoryArgs};
use crate::config::EngineConfig;
use crate::domain::rules::{deal_table, validate_snapshot, TableSetup};
use crate::domain::GameState;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::game_flow::{FlowConfig, FlowOutcome, GameFlowService};

pub struct GameRegistry {
    games: DashMap<String, Arc<GameFlowService>>,
    config: EngineConfig,
}

impl GameRegistry {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            games: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Deals a new table, starts it, and drives to the first suspension.
    pub async fn create(
        &self,
        setup: &TableSetup,
        seed: Option<u64>,
    ) -> Result<(Arc<GameFlowService>, FlowOutcome), AppError> {
        let seed = seed.unwrap_or_else(rand::random);
        let game_id = Uuid::new_v4().to_string();
        let state = deal_table(game_id.clone(), seed, setup)?;
        let decisions = self.decisions(Some(seed))?;

        let service = Arc::new(GameFlowService::new(
            state,
            decisions,
            FlowConfig::from(&self.config),
        ));
        self.games.insert(game_id.clone(), Arc::clone(&service));
        info!(game_id = %game_id, seats = setup.seat_count, human_seat = setup.human_seat, "Game created");

        let outcome = service.start().await?;
        Ok((service, outcome))
    }

    /// Registers a saved state under its own id, replacing any running game
    /// with that id, and drives it. The replaced game is superseded first.
    pub async fn resume(
        &self,
        state: GameState,
    ) -> Result<(Arc<GameFlowService>, FlowOutcome), AppError> {
        validate_snapshot(&state)?;
        let game_id = state.game_id.clone();
        let decisions = self.decisions(Some(state.rng_seed))?;
        let service = Arc::new(GameFlowService::resume(
            state,
            decisions,
            FlowConfig::from(&self.config),
        ));
        if let Some(replaced) = self.games.insert(game_id, Arc::clone(&service)) {
            replaced.supersede();
        }
        let outcome = service.drive().await?;
        Ok((service, outcome))
    }

    /// Registers an already-built service under its game id.
    pub fn insert(&self, service: Arc<GameFlowService>) {
        self.games.insert(service.game_id(), service);
    }

    pub fn get(&self, game_id: &str) -> Result<Arc<GameFlowService>, AppError> {
        self.games
            .get(game_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                AppError::not_found(ErrorCode::GameNotFound, format!("game {game_id} not found"))
            })
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn decisions(&self, seed: Option<u64>) -> Result<Arc<dyn DecisionService>, AppError> {
        let factory = by_name(&self.config.decision_service).ok_or_else(|| {
            AppError::config(format!(
                "decision service '{}' is not registered",
                self.config.decision_service
            ))
        })?;
        let args = FactoryArgs {
            seed,
            url: self.config.decision_url.as_deref(),
        };
        Ok((factory.make)(&args)?)
    }
}
