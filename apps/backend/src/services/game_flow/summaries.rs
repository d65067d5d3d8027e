//! Best-effort day summaries.
//!
//! Requested once per recorded day in a spawned task; the flow never waits
//! on them. A failure leaves the summary absent.

use std::sync::Arc;

use tracing::debug;

use super::{Commit, FlowContext, GameFlowService};
use crate::domain::GameState;

impl GameFlowService {
    pub(super) fn request_summaries(&self, ctx: &FlowContext, state: &Arc<GameState>) {
        let days: Vec<_> = {
            let mut requested = self.summaries.lock();
            state
                .day_history
                .iter()
                .filter(|(_, record)| record.summary.is_none())
                .map(|(day, _)| *day)
                .filter(|day| requested.insert(*day))
                .collect()
        };

        for day in days {
            let store = Arc::clone(&self.store);
            let decisions = Arc::clone(&self.decisions);
            let ctx = ctx.clone();
            let state = Arc::clone(state);
            tokio::spawn(async move {
                let summary = tokio::select! {
                    _ = ctx.token.cancelled() => return,
                    summary = decisions.summarize_day(&state, day) => summary,
                };
                let text = match summary {
                    Ok(text) if !text.trim().is_empty() => text,
                    Ok(_) => return,
                    Err(e) => {
                        debug!(game_id = %state.game_id, day, error = %e, "Day summary unavailable");
                        return;
                    }
                };
                let outcome = store.commit(&ctx, |s| {
                    let mut next = s.clone();
                    if let Some(record) = next.day_history.get_mut(&day) {
                        if record.summary.is_none() {
                            record.summary = Some(text);
                        }
                    }
                    Ok(next)
                });
                if let Ok(Commit::Applied { version }) = outcome {
                    debug!(game_id = %state.game_id, day, version, "Day summary recorded");
                }
            });
        }
    }
}
