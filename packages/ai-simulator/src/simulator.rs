//! Headless game runner.
//!
//! Games run through the same `GameFlowService` the HTTP surface uses; the
//! human seat is answered by a seeded random player and every autonomous
//! speech is revealed immediately.

use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use werewolf_backend::ai::DecisionService;
use werewolf_backend::domain::legal::legal_actions;
use werewolf_backend::domain::rules::{deal_table, TableSetup};
use werewolf_backend::domain::turns::{pending_action, ActionKind};
use werewolf_backend::domain::{GameState, PlayerAction};
use werewolf_backend::error::AppError;
use werewolf_backend::errors::ErrorCode;
use werewolf_backend::services::game_flow::{FlowConfig, FlowOutcome, GameFlowService};

/// Suspensions handled per game before giving up.
const MAX_SUSPENSIONS: usize = 10_000;

const HUMAN_LINES: &[&str] = &[
    "I have nothing to hide.",
    "Watch who votes last.",
    "Someone is too quiet today.",
];

pub struct GameResult {
    pub state: GameState,
    pub human_actions: u32,
    pub advances: u32,
}

pub struct Simulator {
    seed: u64,
    game_num: u32,
}

impl Simulator {
    pub fn new(seed: u64, game_num: u32) -> Self {
        Self { seed, game_num }
    }

    pub async fn simulate_game(
        &self,
        setup: &TableSetup,
        decisions: Arc<dyn DecisionService>,
        config: FlowConfig,
    ) -> Result<GameResult, AppError> {
        let state = deal_table(format!("sim-{}", self.game_num), self.seed, setup)?;
        let service = GameFlowService::new(state, decisions, config);
        let mut human = ChaCha8Rng::seed_from_u64(self.seed ^ 0x48_554D_414E);

        let mut result = GameResult {
            state: service.snapshot().state.as_ref().clone(),
            human_actions: 0,
            advances: 0,
        };
        let mut outcome = service.start().await?;

        for _ in 0..MAX_SUSPENSIONS {
            outcome = match outcome {
                FlowOutcome::AwaitingHuman { seat, .. } => {
                    let action = human_move(&service.snapshot().state, &mut human)?;
                    result.human_actions += 1;
                    service.submit_action(seat, action).await?
                }
                FlowOutcome::AwaitingAdvance { .. } => {
                    result.advances += 1;
                    service.advance_speech().await?
                }
                FlowOutcome::Finished { .. } => {
                    result.state = service.snapshot().state.as_ref().clone();
                    return Ok(result);
                }
                FlowOutcome::Superseded | FlowOutcome::Idle => service.drive().await?,
            };
        }

        Err(AppError::internal(
            ErrorCode::InternalError,
            format!("game {} did not finish", self.game_num),
        ))
    }
}

/// Random legal move for the human seat. Speeches get at most one line.
fn human_move(state: &GameState, rng: &mut ChaCha8Rng) -> Result<PlayerAction, AppError> {
    let pending = pending_action(state).ok_or_else(|| {
        AppError::internal(ErrorCode::InternalError, "human prompted with nothing pending")
    })?;
    match pending.kind {
        ActionKind::Speech | ActionKind::LastWords | ActionKind::WolfChat => {
            let already_spoke = state
                .speech
                .turn
                .as_ref()
                .is_some_and(|turn| !turn.fragments.is_empty());
            if already_spoke || rng.random_bool(0.3) {
                return Ok(PlayerAction::FinishSpeaking);
            }
            let text = HUMAN_LINES.choose(rng).copied().unwrap_or("...");
            Ok(PlayerAction::SpeechFragment {
                text: text.to_string(),
            })
        }
        _ => legal_actions(state, pending)
            .choose(rng)
            .cloned()
            .ok_or_else(|| {
                AppError::internal(
                    ErrorCode::InternalError,
                    format!("no legal action for {:?}", pending.kind),
                )
            }),
    }
}
