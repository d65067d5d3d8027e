//! Who acts next.
//!
//! `pending_action` is the single source of truth for turn-taking: the
//! orchestration loop suspends on it for the human, resolves it through the
//! decision service for autonomous seats, and waits for the presenter on
//! `Advance`.

use serde::{Deserialize, Serialize};

use crate::domain::phase::Phase;
use crate::domain::roles::Role;
use crate::domain::state::{GameState, Seat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    GuardProtect,
    WolfChat,
    WolfVote,
    WitchChoice,
    SeerCheck,
    Speech,
    LastWords,
    DayVote,
    HunterShot,
    /// Presenter reveal of an autonomous speaker's next fragment.
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub seat: Seat,
    pub kind: ActionKind,
}

impl PendingAction {
    fn new(seat: Seat, kind: ActionKind) -> Self {
        Self { seat, kind }
    }
}

pub fn pending_action(state: &GameState) -> Option<PendingAction> {
    match state.phase {
        Phase::NightGuardAction => state
            .living_holder(Role::Guard)
            .map(|s| PendingAction::new(s, ActionKind::GuardProtect)),
        Phase::NightWolfChat => state
            .speech
            .turn
            .as_ref()
            .map(|t| PendingAction::new(t.seat, ActionKind::WolfChat)),
        Phase::NightWolfAction => {
            next_wolf_voter(state).map(|s| PendingAction::new(s, ActionKind::WolfVote))
        }
        Phase::NightWitchAction => state
            .living_holder(Role::Witch)
            .map(|s| PendingAction::new(s, ActionKind::WitchChoice)),
        Phase::NightSeerAction => state
            .living_holder(Role::Seer)
            .map(|s| PendingAction::new(s, ActionKind::SeerCheck)),
        Phase::DaySpeech => speech_pending(state, ActionKind::Speech),
        Phase::DayLastWords => speech_pending(state, ActionKind::LastWords),
        Phase::DayVote => next_day_voter(state).map(|s| PendingAction::new(s, ActionKind::DayVote)),
        Phase::HunterShoot => state
            .pending_hunter
            .map(|h| PendingAction::new(h.seat, ActionKind::HunterShot)),
        Phase::Lobby
        | Phase::Setup
        | Phase::NightStart
        | Phase::NightResolve
        | Phase::DayStart
        | Phase::DayResolve
        | Phase::GameEnd => None,
    }
}

fn speech_pending(state: &GameState, kind: ActionKind) -> Option<PendingAction> {
    let turn = state.speech.turn.as_ref()?;
    if !state.is_human(turn.seat) && turn.is_generated() {
        Some(PendingAction::new(turn.seat, ActionKind::Advance))
    } else {
        Some(PendingAction::new(turn.seat, kind))
    }
}

/// Lowest living wolf that has not yet had its chat turn.
pub fn next_wolf_chatter(state: &GameState) -> Option<Seat> {
    state
        .living_wolves()
        .into_iter()
        .find(|w| !state.night_actions.wolf_chat_done.contains(w))
}

/// Lowest living wolf that has not yet voted tonight.
pub fn next_wolf_voter(state: &GameState) -> Option<Seat> {
    state
        .living_wolves()
        .into_iter()
        .find(|w| !state.night_actions.wolf_votes.iter().any(|v| v.wolf == *w))
}

/// Autonomous voters first, in ascending seat order; the human last if
/// they have not voted on their own yet.
pub fn next_day_voter(state: &GameState) -> Option<Seat> {
    let waiting: Vec<Seat> = state
        .living_seats()
        .into_iter()
        .filter(|s| !state.votes.contains_key(s))
        .collect();
    waiting
        .iter()
        .copied()
        .find(|s| !state.is_human(*s))
        .or_else(|| waiting.first().copied())
}

/// True when the human still has a vote to cast today.
pub fn human_may_vote(state: &GameState) -> bool {
    state.phase == Phase::DayVote
        && state
            .human_seat()
            .is_some_and(|h| state.is_alive(h) && !state.votes.contains_key(&h))
}
