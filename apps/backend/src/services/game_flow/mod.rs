//! Game flow orchestration service - bridges the pure reducer with the
//! decision service and the outside world.
//!
//! One `GameFlowService` owns one game. The orchestration loop settles the
//! state, resolves autonomous seats through the decision service, and
//! suspends whenever the human or the presenter has to act.

mod ai_coordinator;
pub mod epoch;
mod orchestration;
mod player_actions;
mod reconciler;
pub mod store;
mod summaries;

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

pub use self::epoch::{EpochGuard, FlowContext};
pub use self::store::{Commit, GameStore, Snapshot};
use crate::ai::DecisionService;
use crate::config::EngineConfig;
use crate::domain::roles::Alignment;
use crate::domain::state::{Day, GameState, Seat};
use crate::domain::turns::ActionKind;

/// Knobs the orchestration loop reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    /// Decision calls per autonomous turn before the random legal fallback.
    pub decision_attempts: u32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            decision_attempts: 2,
        }
    }
}

impl From<&EngineConfig> for FlowConfig {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            decision_attempts: cfg.decision_attempts,
        }
    }
}

/// Why a drive stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowOutcome {
    /// Waiting on the human seat.
    AwaitingHuman { seat: Seat, action: ActionKind },
    /// Waiting on the presenter to reveal an autonomous speaker's next line.
    AwaitingAdvance { seat: Seat },
    Finished { winner: Option<Alignment> },
    /// A privileged override bumped the epoch mid-drive.
    Superseded,
    /// Nothing to do (still in the lobby).
    Idle,
}

pub struct GameFlowService {
    store: Arc<GameStore>,
    decisions: Arc<dyn DecisionService>,
    config: FlowConfig,
    /// One orchestration routine per game at a time.
    driver: tokio::sync::Mutex<()>,
    /// Days whose summary has already been requested.
    summaries: Arc<Mutex<BTreeSet<Day>>>,
}

impl GameFlowService {
    pub fn new(state: GameState, decisions: Arc<dyn DecisionService>, config: FlowConfig) -> Self {
        Self {
            store: Arc::new(GameStore::new(state)),
            decisions,
            config,
            driver: tokio::sync::Mutex::new(()),
            summaries: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    /// Rebuilds a service from a saved state. The caller drives it.
    pub fn resume(
        state: GameState,
        decisions: Arc<dyn DecisionService>,
        config: FlowConfig,
    ) -> Self {
        tracing::info!(
            game_id = %state.game_id,
            phase = ?state.phase,
            day = state.day,
            "Resuming game from snapshot"
        );
        Self::new(state, decisions, config)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn game_id(&self) -> String {
        self.store.snapshot().state.game_id.clone()
    }

    pub fn epoch(&self) -> u64 {
        self.store.epoch()
    }

    /// Retires this service: bumps the epoch so any in-flight routine is
    /// cancelled and nothing it computes is committed.
    pub fn supersede(&self) {
        let ctx = self.store.retire();
        self.summaries.lock().clear();
        tracing::info!(game_id = %self.game_id(), epoch = ctx.epoch, "Game flow superseded");
    }
}
