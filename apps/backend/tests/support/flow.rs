//! Helpers for driving games through `GameFlowService` in tests.

use std::sync::Arc;

use werewolf_backend::ai::DecisionService;
use werewolf_backend::domain::legal::legal_actions;
use werewolf_backend::domain::roles::Role;
use werewolf_backend::domain::rules::{deal_table, TableSetup};
use werewolf_backend::domain::turns::{pending_action, ActionKind};
use werewolf_backend::domain::{GameState, PlayerAction};
use werewolf_backend::services::game_flow::{FlowConfig, FlowOutcome, GameFlowService};

/// Upper bound on suspensions handled by `play_out`.
pub const MAX_SUSPENSIONS: usize = 5_000;

pub fn new_service(
    setup: &TableSetup,
    seed: u64,
    decisions: Arc<dyn DecisionService>,
) -> Arc<GameFlowService> {
    let state = deal_table(format!("it-{seed}"), seed, setup).expect("valid table setup");
    Arc::new(GameFlowService::new(state, decisions, FlowConfig::default()))
}

/// Seat order of `pinned_table`: wolves at 0 and 1, then Seer, Witch,
/// Hunter and Guard. The Guard (seat 5) is the human.
pub const PINNED_ROLES: [Role; 6] = [
    Role::Werewolf,
    Role::Werewolf,
    Role::Seer,
    Role::Witch,
    Role::Hunter,
    Role::Guard,
];

/// Lobby state with roles placed as `PINNED_ROLES`.
pub fn pinned_table(game_id: &str) -> GameState {
    let mut state =
        deal_table(game_id, 7, &TableSetup::standard(6, 5)).expect("valid table setup");
    for (player, role) in state.players.iter_mut().zip(PINNED_ROLES) {
        player.role = role;
    }
    state
}

pub fn pinned_service(game_id: &str, decisions: Arc<dyn DecisionService>) -> Arc<GameFlowService> {
    Arc::new(GameFlowService::new(
        pinned_table(game_id),
        decisions,
        FlowConfig::default(),
    ))
}

/// First legal choice for the waiting human, or finishing their speech.
pub fn human_move(state: &GameState) -> PlayerAction {
    let pending = pending_action(state).expect("someone should be pending");
    match pending.kind {
        ActionKind::WolfChat | ActionKind::Speech | ActionKind::LastWords => {
            PlayerAction::FinishSpeaking
        }
        _ => legal_actions(state, pending)
            .into_iter()
            .next()
            .expect("at least one legal action"),
    }
}

/// Answers every suspension until the game stops needing input.
pub async fn play_out(service: &GameFlowService, mut outcome: FlowOutcome) -> FlowOutcome {
    for _ in 0..MAX_SUSPENSIONS {
        outcome = match outcome {
            FlowOutcome::AwaitingHuman { seat, .. } => {
                let action = human_move(&service.snapshot().state);
                service
                    .submit_action(seat, action)
                    .await
                    .expect("human move should be accepted")
            }
            FlowOutcome::AwaitingAdvance { .. } => service
                .advance_speech()
                .await
                .expect("advance should be accepted"),
            done => return done,
        };
    }
    panic!("game did not finish within {MAX_SUSPENSIONS} suspensions");
}
