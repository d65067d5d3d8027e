//! Legal choices per pending action.
//!
//! Used by the baseline decision service and by the fallback path when the
//! decision service fails or returns something unusable.

use crate::domain::events::{NightAction, PlayerAction, WitchChoice};
use crate::domain::state::{GameState, Seat};
use crate::domain::turns::{ActionKind, PendingAction};

/// Living seats other than `actor`.
pub fn others_alive(state: &GameState, actor: Seat) -> Vec<Seat> {
    state
        .living_seats()
        .into_iter()
        .filter(|s| *s != actor)
        .collect()
}

/// `None` (pass) followed by every living seat except last night's target.
pub fn guard_targets(state: &GameState) -> Vec<Option<Seat>> {
    let last = state.night_actions.last_guard_target;
    std::iter::once(None)
        .chain(
            state
                .living_seats()
                .into_iter()
                .filter(|s| Some(*s) != last)
                .map(Some),
        )
        .collect()
}

pub fn wolf_targets(state: &GameState) -> Vec<Seat> {
    state
        .living_seats()
        .into_iter()
        .filter(|s| !state.is_wolf(*s))
        .collect()
}

pub fn witch_choices(state: &GameState, witch: Seat) -> Vec<WitchChoice> {
    let abilities = state.role_abilities;
    let mut out = vec![WitchChoice::Pass];
    if !abilities.witch_heal_used && state.night_actions.wolf_target.is_some() {
        out.push(WitchChoice::Save);
    }
    if !abilities.witch_poison_used {
        out.extend(
            others_alive(state, witch)
                .into_iter()
                .map(|target| WitchChoice::Poison { target }),
        );
    }
    out
}

pub fn seer_targets(state: &GameState, seer: Seat) -> Vec<Seat> {
    others_alive(state, seer)
}

pub fn vote_targets(state: &GameState, voter: Seat) -> Vec<Seat> {
    others_alive(state, voter)
}

/// `None` (decline) followed by every living seat other than the Hunter.
pub fn shot_targets(state: &GameState, hunter: Seat) -> Vec<Option<Seat>> {
    std::iter::once(None)
        .chain(others_alive(state, hunter).into_iter().map(Some))
        .collect()
}

/// Every legal non-speech action for `pending`. Empty for speech turns and
/// presenter advances, which have no finite choice set.
pub fn legal_actions(state: &GameState, pending: PendingAction) -> Vec<PlayerAction> {
    let night = |action: NightAction| PlayerAction::NightAction { action };
    match pending.kind {
        ActionKind::GuardProtect => guard_targets(state)
            .into_iter()
            .map(|target| night(NightAction::Guard { target }))
            .collect(),
        ActionKind::WolfVote => wolf_targets(state)
            .into_iter()
            .map(|target| night(NightAction::WolfVote { target }))
            .collect(),
        ActionKind::WitchChoice => witch_choices(state, pending.seat)
            .into_iter()
            .map(|choice| night(NightAction::Witch { choice }))
            .collect(),
        ActionKind::SeerCheck => seer_targets(state, pending.seat)
            .into_iter()
            .map(|target| night(NightAction::SeerCheck { target }))
            .collect(),
        ActionKind::DayVote => vote_targets(state, pending.seat)
            .into_iter()
            .map(|target| PlayerAction::CastVote { target })
            .collect(),
        ActionKind::HunterShot => shot_targets(state, pending.seat)
            .into_iter()
            .map(|target| night(NightAction::HunterShoot { target }))
            .collect(),
        ActionKind::WolfChat | ActionKind::Speech | ActionKind::LastWords | ActionKind::Advance => {
            Vec::new()
        }
    }
}
