use tracing::{debug, info};

use super::{Commit, FlowContext, FlowOutcome, GameFlowService};
use crate::domain::apply;
use crate::domain::phase::Phase;
use crate::domain::turns::{pending_action, ActionKind};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Upper bound on loop iterations per drive. A long game is a few hundred
/// autonomous actions; hitting this means the loop is not making progress.
const MAX_ITERATIONS: usize = 5_000;

impl GameFlowService {
    /// Runs the orchestration loop until it has to wait on someone.
    ///
    /// Only one drive runs per game; a second caller waits for the first
    /// to suspend and then re-reads the state.
    pub async fn drive(&self) -> Result<FlowOutcome, AppError> {
        let _driver = self.driver.lock().await;
        let ctx = self.store.context();
        self.process_game_state(&ctx).await
    }

    /// Core orchestrator loop.
    ///
    /// Each iteration reads a snapshot and either:
    /// 1. returns `Finished` when the game has ended,
    /// 2. returns `AwaitingHuman` / `AwaitingAdvance` when someone outside
    ///    the engine has to act,
    /// 3. resolves an autonomous seat through the decision service and
    ///    commits it, or
    /// 4. returns `Superseded` once `ctx` is no longer the current epoch.
    ///
    /// # Return Values
    ///
    /// - `Err(AppError::Internal)` when `MAX_ITERATIONS` is exceeded
    pub(super) async fn process_game_state(
        &self,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome, AppError> {
        for _iteration in 0..MAX_ITERATIONS {
            if ctx.is_cancelled() {
                return Ok(FlowOutcome::Superseded);
            }

            let snap = self.store.snapshot();
            let state = snap.state;
            self.request_summaries(ctx, &state);

            if state.is_over() {
                info!(game_id = %state.game_id, winner = ?state.winner, day = state.day, "Game finished");
                return Ok(FlowOutcome::Finished {
                    winner: state.winner,
                });
            }

            let Some(pending) = pending_action(&state) else {
                if state.phase != Phase::Lobby {
                    debug!(game_id = %state.game_id, phase = ?state.phase, "No pending actor");
                }
                return Ok(FlowOutcome::Idle);
            };

            if pending.kind == ActionKind::Advance {
                return Ok(FlowOutcome::AwaitingAdvance { seat: pending.seat });
            }
            if state.is_human(pending.seat) {
                debug!(
                    game_id = %state.game_id,
                    seat = pending.seat,
                    action = ?pending.kind,
                    "Waiting on human"
                );
                return Ok(FlowOutcome::AwaitingHuman {
                    seat: pending.seat,
                    action: pending.kind,
                });
            }

            let Some(event) = self.decide(ctx, &state, pending).await? else {
                return Ok(FlowOutcome::Superseded);
            };

            match self.store.commit(ctx, |s| apply(s, &event)) {
                Ok(Commit::Applied { version }) => {
                    debug!(
                        game_id = %state.game_id,
                        seat = pending.seat,
                        action = ?pending.kind,
                        version,
                        "Autonomous action committed"
                    );
                }
                Ok(Commit::Discarded) => return Ok(FlowOutcome::Superseded),
                // A human submission landed between snapshot and commit.
                Err(e) if e.is_rejection() => {
                    debug!(game_id = %state.game_id, error = %e, "State moved under decision; re-reading");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::internal(
            ErrorCode::InternalError,
            format!("process_game_state exceeded max iterations {MAX_ITERATIONS}"),
        ))
    }
}
