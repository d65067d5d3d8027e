use tracing::{info, warn};

use super::GameFlowService;
use crate::domain::overrides::{reconcile, OverrideRequest, ReconcileMode, ReconcileReport};
use crate::error::AppError;

impl GameFlowService {
    /// Privileged edit of phase, day, or night bookkeeping.
    ///
    /// Always bumps the epoch first, so any routine suspended on a decision
    /// is cancelled and its pending commit discarded, even when the request
    /// itself is refused. Does not drive; callers drive afterwards.
    pub fn apply_override(&self, request: OverrideRequest) -> Result<ReconcileReport, AppError> {
        let game_id = self.game_id();
        let result = self.store.supersede(|s| reconcile(s, request));
        let (report, ctx) = match result {
            Ok(ok) => ok,
            Err(e) => {
                warn!(game_id = %game_id, epoch = self.epoch(), error = %e, "Override refused");
                return Err(e.into());
            }
        };
        self.summaries.lock().clear();

        if report.non_canonical {
            warn!(
                game_id = %game_id,
                from = ?report.from,
                to = ?report.to,
                epoch = ctx.epoch,
                "Override jumped outside the phase table"
            );
        }
        match report.mode {
            ReconcileMode::HardReset => info!(
                game_id = %game_id,
                from = ?report.from,
                to = ?report.to,
                epoch = ctx.epoch,
                "Override applied with hard reset"
            ),
            ReconcileMode::SoftResume => info!(
                game_id = %game_id,
                phase = ?report.to,
                epoch = ctx.epoch,
                "Override applied, resuming"
            ),
        }
        Ok(report)
    }
}
