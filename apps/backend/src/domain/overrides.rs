//! Privileged state edits and how the machine reconciles with them.
//!
//! A phase or day change is a hard reset: per-turn bookkeeping is dropped
//! and the target phase is entered afresh. An edit that leaves phase and
//! day alone is a soft resume: bookkeeping is kept and the machine settles
//! with the new data. Alive flags, roles and ability flags are never
//! editable here.

use serde::{Deserialize, Serialize};

use crate::domain::flow::{enter_phase, settle, Entry};
use crate::domain::phase::Phase;
use crate::domain::roles::Alignment;
use crate::domain::state::{Day, GameState, SeerCheck, Seat, WolfVote};
use crate::errors::domain::{DomainError, NotFoundKind, RejectKind};

/// Patch over `NightActions`. For optional fields the outer `Option` means
/// "leave unchanged" and `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActionsPatch {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub guard_target: Option<Option<Seat>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub last_guard_target: Option<Option<Seat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wolf_chat_done: Option<Vec<Seat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wolf_votes: Option<Vec<WolfVote>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub wolf_target: Option<Option<Seat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witch_save: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub witch_poison: Option<Option<Seat>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub seer_target: Option<Option<Seat>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub seer_result: Option<Option<Alignment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seer_history: Option<Vec<SeerCheck>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRequest {
    #[serde(default)]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub day: Option<Day>,
    #[serde(default)]
    pub night_actions: NightActionsPatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcileMode {
    HardReset,
    SoftResume,
}

/// What `reconcile` did, for the caller to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub mode: ReconcileMode,
    pub from: Phase,
    pub to: Phase,
    /// The jump is not an edge of the phase table.
    pub non_canonical: bool,
}

impl NightActionsPatch {
    fn seats(&self) -> Vec<Seat> {
        let mut out: Vec<Seat> = [
            self.guard_target,
            self.last_guard_target,
            self.wolf_target,
            self.witch_poison,
            self.seer_target,
        ]
        .into_iter()
        .flatten()
        .flatten()
        .collect();
        if let Some(done) = &self.wolf_chat_done {
            out.extend(done.iter().copied());
        }
        if let Some(votes) = &self.wolf_votes {
            out.extend(votes.iter().flat_map(|v| [v.wolf, v.target]));
        }
        if let Some(history) = &self.seer_history {
            out.extend(history.iter().map(|c| c.target));
        }
        out
    }

    fn apply_to(self, state: &mut GameState) {
        let night = &mut state.night_actions;
        if let Some(v) = self.guard_target {
            night.guard_target = v;
        }
        if let Some(v) = self.last_guard_target {
            night.last_guard_target = v;
        }
        if let Some(v) = self.wolf_chat_done {
            night.wolf_chat_done = v;
        }
        if let Some(v) = self.wolf_votes {
            night.wolf_votes = v;
        }
        if let Some(v) = self.wolf_target {
            night.wolf_target = v;
        }
        if let Some(v) = self.witch_save {
            night.witch_save = v;
        }
        if let Some(v) = self.witch_poison {
            night.witch_poison = v;
        }
        if let Some(v) = self.seer_target {
            night.seer_target = v;
        }
        if let Some(v) = self.seer_result {
            night.seer_result = v;
        }
        if let Some(v) = self.seer_history {
            night.seer_history = v;
        }
    }
}

/// Drops per-turn bookkeeping ahead of a forced phase entry.
fn hard_reset(state: &mut GameState, target: Phase) {
    state.speech.turn = None;
    state.speech.lap_start = None;
    state.current_speaker_seat = None;
    state.night_actions.wolf_chat_done.clear();
    if matches!(
        target,
        Phase::NightGuardAction | Phase::NightWolfChat | Phase::NightWolfAction
    ) {
        state.night_actions.wolf_votes.clear();
        state.night_actions.wolf_target = None;
    }
    state.votes.clear();
    state.last_words_seat = None;
    state.pending_hunter = None;
}

pub fn reconcile(
    state: &GameState,
    request: OverrideRequest,
) -> Result<(GameState, ReconcileReport), DomainError> {
    if state.is_over() {
        return Err(DomainError::rejected(
            RejectKind::GameOver,
            "game has ended",
        ));
    }
    if let Some(bad) = request
        .night_actions
        .seats()
        .into_iter()
        .find(|s| state.player(*s).is_none())
    {
        return Err(DomainError::not_found(
            NotFoundKind::Seat,
            format!("no seat {bad}"),
        ));
    }

    let from = state.phase;
    let to = request.phase.unwrap_or(from);
    let hard = to != from || request.day.is_some_and(|d| d != state.day);

    let mut next = state.clone();
    if hard {
        if let Some(day) = request.day {
            next.day = day;
        }
        hard_reset(&mut next, to);
        enter_phase(&mut next, to, Entry::Forced)?;
    }
    request.night_actions.apply_to(&mut next);
    let next = settle(next)?;

    Ok((
        next,
        ReconcileReport {
            mode: if hard {
                ReconcileMode::HardReset
            } else {
                ReconcileMode::SoftResume
            },
            from,
            to,
            non_canonical: hard && to != from && !from.can_transition_to(to).is_allowed(),
        },
    ))
}
