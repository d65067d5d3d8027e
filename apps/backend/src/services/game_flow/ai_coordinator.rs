use rand::seq::IndexedRandom;
use tracing::{info, warn};

use super::{FlowContext, GameFlowService};
use crate::ai::{AiError, DecisionService};
use crate::domain::apply;
use crate::domain::events::{GameEvent, NightAction, PlayerAction};
use crate::domain::legal::legal_actions;
use crate::domain::roles::Role;
use crate::domain::seed_derivation::{derive_fallback_seed, rng_from};
use crate::domain::speech::PLACEHOLDER_FRAGMENT;
use crate::domain::state::{GameState, SpeechKind};
use crate::domain::turns::{ActionKind, PendingAction};
use crate::error::AppError;
use crate::errors::ErrorCode;

impl GameFlowService {
    /// Resolves one autonomous turn into an event that applies cleanly to
    /// `state`.
    ///
    /// Each attempt is raced against the context's cancellation. Errors
    /// and unusable answers are retried up to `decision_attempts` times,
    /// then replaced by a seeded random legal choice.
    ///
    /// Returns `None` when the epoch was bumped while waiting.
    pub(super) async fn decide(
        &self,
        ctx: &FlowContext,
        state: &GameState,
        pending: PendingAction,
    ) -> Result<Option<GameEvent>, AppError> {
        let attempts = self.config.decision_attempts.max(1);
        for attempt in 1..=attempts {
            let answer = tokio::select! {
                _ = ctx.token.cancelled() => return Ok(None),
                answer = ask(self.decisions.as_ref(), state, pending) => answer,
            };
            if ctx.is_cancelled() {
                return Ok(None);
            }

            match answer {
                Ok(event) => match apply(state, &event) {
                    Ok(_) => return Ok(Some(event)),
                    Err(e) => warn!(
                        game_id = %state.game_id,
                        seat = pending.seat,
                        action = ?pending.kind,
                        attempt,
                        error = %e,
                        "Decision service answer rejected"
                    ),
                },
                Err(e) => warn!(
                    game_id = %state.game_id,
                    seat = pending.seat,
                    action = ?pending.kind,
                    attempt,
                    error = %e,
                    "Decision service call failed"
                ),
            }
        }

        warn!(
            game_id = %state.game_id,
            seat = pending.seat,
            action = ?pending.kind,
            attempts,
            "Falling back to a random legal choice"
        );
        fallback(state, pending).map(Some)
    }
}

/// One decision service call, translated into the reducer event it asks for.
async fn ask(
    decisions: &dyn DecisionService,
    state: &GameState,
    pending: PendingAction,
) -> Result<GameEvent, AiError> {
    let seat = pending.seat;
    let act = |action: PlayerAction| GameEvent::Act { seat, action };
    let night = |action: NightAction| act(PlayerAction::NightAction { action });

    let event = match pending.kind {
        ActionKind::GuardProtect => {
            let target = decisions.choose_night_target(state, seat, Role::Guard).await?;
            night(NightAction::Guard { target })
        }
        ActionKind::WolfVote => {
            let target = decisions
                .choose_night_target(state, seat, Role::Werewolf)
                .await?
                .ok_or_else(|| AiError::InvalidMove("wolves cannot pass".into()))?;
            night(NightAction::WolfVote { target })
        }
        ActionKind::SeerCheck => {
            let target = decisions
                .choose_night_target(state, seat, Role::Seer)
                .await?
                .ok_or_else(|| AiError::InvalidMove("the Seer cannot pass".into()))?;
            night(NightAction::SeerCheck { target })
        }
        ActionKind::WitchChoice => {
            let choice = decisions.choose_witch_action(state, seat).await?;
            night(NightAction::Witch { choice })
        }
        ActionKind::HunterShot => {
            let target = decisions.choose_shot(state, seat).await?;
            night(NightAction::HunterShoot { target })
        }
        ActionKind::DayVote => {
            let target = decisions.choose_vote(state, seat).await?;
            act(PlayerAction::CastVote { target })
        }
        ActionKind::WolfChat | ActionKind::Speech | ActionKind::LastWords => {
            let kind = speech_kind(pending.kind);
            let fragments = decisions.speak(state, seat, kind).await?;
            GameEvent::SpeechGenerated { seat, fragments }
        }
        ActionKind::Advance => {
            return Err(AiError::Internal("advance is the presenter's move".into()))
        }
    };
    Ok(event)
}

fn speech_kind(kind: ActionKind) -> SpeechKind {
    match kind {
        ActionKind::WolfChat => SpeechKind::WolfChat,
        ActionKind::LastWords => SpeechKind::LastWords,
        _ => SpeechKind::Day,
    }
}

/// Seeded uniform choice over the legal set; a placeholder line for speech.
fn fallback(state: &GameState, pending: PendingAction) -> Result<GameEvent, AppError> {
    let seat = pending.seat;
    if matches!(
        pending.kind,
        ActionKind::WolfChat | ActionKind::Speech | ActionKind::LastWords
    ) {
        return Ok(GameEvent::SpeechGenerated {
            seat,
            fragments: vec![PLACEHOLDER_FRAGMENT.to_string()],
        });
    }

    let options = legal_actions(state, pending);
    let mut rng = rng_from(derive_fallback_seed(
        state.rng_seed,
        state.day,
        seat,
        state.phase,
    ));
    let action = options.choose(&mut rng).cloned().ok_or_else(|| {
        AppError::internal(
            ErrorCode::InternalError,
            format!("no legal {:?} for seat {seat} in {:?}", pending.kind, state.phase),
        )
    })?;
    info!(game_id = %state.game_id, seat, action = action.label(), "Fallback choice");
    Ok(GameEvent::Act { seat, action })
}
