//! Deterministic decision services for tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

use crate::ai::{AiError, DecisionService};
use crate::domain::events::WitchChoice;
use crate::domain::legal;
use crate::domain::roles::Role;
use crate::domain::state::{Day, GameState, Seat, SpeechKind};

/// Fixed answers; anything left unset falls back to the first legal
/// choice (lowest seat, or the pass where one exists).
#[derive(Debug, Clone, Default)]
pub struct ScriptPlan {
    pub guard_target: Option<Option<Seat>>,
    pub wolf_target: Option<Seat>,
    pub witch: Option<WitchChoice>,
    pub seer_target: Option<Seat>,
    pub vote_target: Option<Seat>,
    pub shot: Option<Option<Seat>>,
    pub speech: Vec<String>,
    /// Every call fails with `AiError::Internal`.
    pub fail: bool,
}

/// Scripted decision service. Records every call as `(seat, request)`.
#[derive(Default)]
pub struct ScriptedDecisions {
    plan: Mutex<ScriptPlan>,
    calls: Mutex<Vec<(Seat, &'static str)>>,
}

impl ScriptedDecisions {
    pub fn new(plan: ScriptPlan) -> Self {
        Self {
            plan: Mutex::new(plan),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_plan(&self, plan: ScriptPlan) {
        *self.plan.lock() = plan;
    }

    pub fn calls(&self) -> Vec<(Seat, &'static str)> {
        self.calls.lock().clone()
    }

    fn record(&self, seat: Seat, what: &'static str) -> Result<ScriptPlan, AiError> {
        self.calls.lock().push((seat, what));
        let plan = self.plan.lock().clone();
        if plan.fail {
            return Err(AiError::Internal(format!("scripted failure for {what}")));
        }
        Ok(plan)
    }
}

fn first<T: Clone>(options: &[T], what: &str) -> Result<T, AiError> {
    options
        .first()
        .cloned()
        .ok_or_else(|| AiError::InvalidMove(format!("no legal {what}")))
}

#[async_trait]
impl DecisionService for ScriptedDecisions {
    async fn speak(
        &self,
        _state: &GameState,
        seat: Seat,
        kind: SpeechKind,
    ) -> Result<Vec<String>, AiError> {
        let plan = self.record(seat, "speak")?;
        if plan.speech.is_empty() {
            Ok(vec![format!("seat {seat} {kind:?} line")])
        } else {
            Ok(plan.speech)
        }
    }

    async fn choose_vote(&self, state: &GameState, seat: Seat) -> Result<Seat, AiError> {
        let plan = self.record(seat, "vote")?;
        match plan.vote_target {
            Some(t) if t != seat => Ok(t),
            _ => first(&legal::vote_targets(state, seat), "vote"),
        }
    }

    async fn choose_night_target(
        &self,
        state: &GameState,
        seat: Seat,
        role: Role,
    ) -> Result<Option<Seat>, AiError> {
        let plan = self.record(seat, "night_target")?;
        match role {
            Role::Guard => match plan.guard_target {
                Some(t) => Ok(t),
                None => first(&legal::guard_targets(state), "guard target"),
            },
            Role::Werewolf => match plan.wolf_target {
                Some(t) => Ok(Some(t)),
                None => first(&legal::wolf_targets(state), "wolf target").map(Some),
            },
            Role::Seer => match plan.seer_target {
                Some(t) => Ok(Some(t)),
                None => first(&legal::seer_targets(state, seat), "seer target").map(Some),
            },
            other => Err(AiError::InvalidMove(format!("{other} has no night target"))),
        }
    }

    async fn choose_witch_action(
        &self,
        _state: &GameState,
        seat: Seat,
    ) -> Result<WitchChoice, AiError> {
        let plan = self.record(seat, "witch")?;
        Ok(plan.witch.unwrap_or(WitchChoice::Pass))
    }

    async fn choose_shot(&self, _state: &GameState, seat: Seat) -> Result<Option<Seat>, AiError> {
        let plan = self.record(seat, "shot")?;
        Ok(plan.shot.unwrap_or(None))
    }
}

/// Wraps another service and holds every call until released.
///
/// `wait_entered` resolves once a call is parked at the gate; `release`
/// lets `n` calls through.
pub struct GatedDecisions {
    inner: Arc<dyn DecisionService>,
    entered: Notify,
    permits: Semaphore,
}

impl GatedDecisions {
    pub fn new(inner: Arc<dyn DecisionService>) -> Self {
        Self {
            inner,
            entered: Notify::new(),
            permits: Semaphore::new(0),
        }
    }

    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }

    async fn gate(&self) -> Result<(), AiError> {
        self.entered.notify_one();
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AiError::Internal(format!("gate closed: {e}")))?;
        permit.forget();
        Ok(())
    }
}

#[async_trait]
impl DecisionService for GatedDecisions {
    async fn speak(
        &self,
        state: &GameState,
        seat: Seat,
        kind: SpeechKind,
    ) -> Result<Vec<String>, AiError> {
        self.gate().await?;
        self.inner.speak(state, seat, kind).await
    }

    async fn choose_vote(&self, state: &GameState, seat: Seat) -> Result<Seat, AiError> {
        self.gate().await?;
        self.inner.choose_vote(state, seat).await
    }

    async fn choose_night_target(
        &self,
        state: &GameState,
        seat: Seat,
        role: Role,
    ) -> Result<Option<Seat>, AiError> {
        self.gate().await?;
        self.inner.choose_night_target(state, seat, role).await
    }

    async fn choose_witch_action(
        &self,
        state: &GameState,
        seat: Seat,
    ) -> Result<WitchChoice, AiError> {
        self.gate().await?;
        self.inner.choose_witch_action(state, seat).await
    }

    async fn choose_shot(&self, state: &GameState, seat: Seat) -> Result<Option<Seat>, AiError> {
        self.gate().await?;
        self.inner.choose_shot(state, seat).await
    }

    async fn summarize_day(&self, state: &GameState, day: Day) -> Result<String, AiError> {
        self.inner.summarize_day(state, day).await
    }
}
