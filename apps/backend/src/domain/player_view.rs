//! Player view of game state - what information is visible to one seat.
//!
//! [`PlayerView`] is the seat-scoped projection served to the presentation
//! layer. The full [`GameState`] is never sent to a client as-is; it leaks
//! every role.
//!
//! # Visibility rules
//!
//! - Your own role is always visible.
//! - Other roles are hidden, except that a wolf sees fellow wolves, and
//!   every role is revealed once the game has ended.
//! - Wolf chat is only included for wolves.
//! - The Seer sees their own check history.
//! - The Witch sees the wolves' target during the Witch sub-phase; wolves
//!   see the target they chose.
//! - The pending action is included only when it belongs to the viewer.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::phase::Phase;
use crate::domain::roles::{Alignment, Role};
use crate::domain::state::{Day, DayRecord, GameState, Message, MessageKind, SeerCheck, Seat};
use crate::domain::turns::{human_may_vote, pending_action, ActionKind, PendingAction};
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub seat: Seat,
    pub name: String,
    pub alive: bool,
    pub is_human: bool,
    /// `None` while hidden from the viewer.
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PotionView {
    pub heal_available: bool,
    pub poison_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub game_id: String,
    pub viewer: Seat,
    pub role: Role,
    pub alive: bool,
    pub phase: Phase,
    pub day: Day,
    pub players: Vec<SeatView>,
    pub messages: Vec<Message>,
    pub current_speaker_seat: Option<Seat>,
    /// Current day's votes; public.
    pub votes: BTreeMap<Seat, Seat>,
    pub day_history: BTreeMap<Day, DayRecord>,
    pub seer_history: Vec<SeerCheck>,
    pub wolf_target: Option<Seat>,
    pub potions: Option<PotionView>,
    /// Seat the Guard may not protect tonight.
    pub last_guard_target: Option<Seat>,
    pub pending: Option<PendingAction>,
    pub winner: Option<Alignment>,
}

impl PlayerView {
    pub fn for_seat(state: &GameState, viewer: Seat) -> Result<Self, DomainError> {
        let me = state.player(viewer).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Seat, format!("no seat {viewer}"))
        })?;
        let is_wolf = me.is_wolf();
        let ended = state.is_over();

        let players = state
            .players
            .iter()
            .map(|p| SeatView {
                seat: p.seat,
                name: p.name.clone(),
                alive: p.alive,
                is_human: p.is_human,
                role: (ended || p.seat == viewer || (is_wolf && p.is_wolf())).then_some(p.role),
            })
            .collect();

        let messages = state
            .messages
            .iter()
            .filter(|m| is_wolf || m.kind != MessageKind::WolfChat)
            .cloned()
            .collect();

        let night = &state.night_actions;
        let wolf_target = match me.role {
            Role::Witch if state.phase == Phase::NightWitchAction => night.wolf_target,
            Role::Werewolf if state.phase.is_night() => night.wolf_target,
            _ => None,
        };
        let potions = (me.role == Role::Witch).then_some(PotionView {
            heal_available: !state.role_abilities.witch_heal_used,
            poison_available: !state.role_abilities.witch_poison_used,
        });

        Ok(Self {
            game_id: state.game_id.clone(),
            viewer,
            role: me.role,
            alive: me.alive,
            phase: state.phase,
            day: state.day,
            players,
            messages,
            current_speaker_seat: state.current_speaker_seat,
            votes: state.votes.clone(),
            day_history: state.day_history.clone(),
            seer_history: if me.role == Role::Seer {
                night.seer_history.clone()
            } else {
                Vec::new()
            },
            wolf_target,
            potions,
            last_guard_target: (me.role == Role::Guard)
                .then_some(night.last_guard_target)
                .flatten(),
            pending: viewer_pending(state, viewer),
            winner: state.winner,
        })
    }

    #[inline]
    pub fn is_my_turn(&self) -> bool {
        self.pending.is_some()
    }
}

/// The action the viewer owes, if any. A human may vote at any point during
/// the day vote, not only when the ascending walk reaches them.
fn viewer_pending(state: &GameState, viewer: Seat) -> Option<PendingAction> {
    if state.is_human(viewer) && human_may_vote(state) {
        return Some(PendingAction {
            seat: viewer,
            kind: ActionKind::DayVote,
        });
    }
    pending_action(state).filter(|p| p.seat == viewer && p.kind != ActionKind::Advance)
}
