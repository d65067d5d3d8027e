use tracing::{info, warn};

use super::{FlowOutcome, GameFlowService};
use crate::domain::apply;
use crate::domain::events::{GameEvent, PlayerAction};
use crate::domain::state::Seat;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, RejectKind};

impl GameFlowService {
    /// Leaves the lobby and drives until the first suspension.
    pub async fn start(&self) -> Result<FlowOutcome, AppError> {
        let (_, version) = self
            .store
            .update(|s| apply(s, &GameEvent::Start).map(|next| (next, ())))?;
        info!(game_id = %self.game_id(), version, "Game started");
        self.drive().await
    }

    /// Human submission. Validated against the latest state, committed, then
    /// the flow is driven to its next suspension.
    ///
    /// A rejection leaves the state untouched and is returned as-is.
    pub async fn submit_action(
        &self,
        seat: Seat,
        action: PlayerAction,
    ) -> Result<FlowOutcome, AppError> {
        let event = GameEvent::Act {
            seat,
            action: action.clone(),
        };
        let result = self.store.update(|s| {
            if s.player(seat).is_none() {
                return Err(DomainError::not_found(
                    NotFoundKind::Seat,
                    format!("no seat {seat}"),
                ));
            }
            if !s.is_human(seat) {
                return Err(DomainError::rejected(
                    RejectKind::NotHumanSeat,
                    format!("seat {seat} is not the human seat"),
                ));
            }
            apply(s, &event).map(|next| (next, ()))
        });

        match result {
            Ok((_, version)) => {
                info!(
                    game_id = %self.game_id(),
                    seat,
                    action = action.label(),
                    version,
                    "Human action applied"
                );
            }
            Err(e) => {
                warn!(
                    game_id = %self.game_id(),
                    seat,
                    action = action.label(),
                    error = %e,
                    "Human action rejected"
                );
                return Err(e.into());
            }
        }
        self.drive().await
    }

    /// Presenter reveal of the next fragment of an autonomous speech.
    pub async fn advance_speech(&self) -> Result<FlowOutcome, AppError> {
        if let Err(e) = self
            .store
            .update(|s| apply(s, &GameEvent::Advance).map(|next| (next, ())))
        {
            warn!(game_id = %self.game_id(), error = %e, "Advance rejected");
            return Err(e.into());
        }
        self.drive().await
    }
}
