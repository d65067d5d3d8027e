//! Night role actions and death causation.

use std::collections::BTreeMap;

use crate::domain::events::WitchChoice;
use crate::domain::phase::Phase;
use crate::domain::roles::Role;
use crate::domain::state::{
    Death, DeathCause, GameState, HunterTrigger, NightRecord, SeerCheck, Seat, WolfVote,
};
use crate::domain::turns::next_wolf_voter;
use crate::errors::domain::{DomainError, RejectKind};

/// Common gate for night actors: right phase, alive, and the expected seat.
pub(crate) fn expect_actor(
    state: &GameState,
    phase: Phase,
    expected: Option<Seat>,
    seat: Seat,
    label: &str,
) -> Result<(), DomainError> {
    if state.phase != phase {
        return Err(DomainError::phase_mismatch(label, state.phase));
    }
    if !state.is_alive(seat) {
        return Err(DomainError::rejected(
            RejectKind::ActorDead,
            format!("seat {seat} is dead"),
        ));
    }
    if expected != Some(seat) {
        return Err(DomainError::out_of_turn(seat, state.phase));
    }
    Ok(())
}

pub fn guard(state: &mut GameState, seat: Seat, target: Option<Seat>) -> Result<(), DomainError> {
    expect_actor(
        state,
        Phase::NightGuardAction,
        state.living_holder(Role::Guard),
        seat,
        "guard protect",
    )?;
    if let Some(t) = target {
        if !state.is_alive(t) {
            return Err(DomainError::invalid_target(t, "not alive"));
        }
        if state.night_actions.last_guard_target == Some(t) {
            return Err(DomainError::invalid_target(
                t,
                "protected on the previous night",
            ));
        }
    }
    state.night_actions.guard_target = target;
    Ok(())
}

pub fn wolf_vote(state: &mut GameState, seat: Seat, target: Seat) -> Result<(), DomainError> {
    expect_actor(
        state,
        Phase::NightWolfAction,
        next_wolf_voter(state),
        seat,
        "wolf vote",
    )?;
    if !state.is_alive(target) {
        return Err(DomainError::invalid_target(target, "not alive"));
    }
    if state.is_wolf(target) {
        return Err(DomainError::invalid_target(target, "wolves cannot target wolves"));
    }
    state
        .night_actions
        .wolf_votes
        .push(WolfVote { wolf: seat, target });
    Ok(())
}

/// Plurality of the recorded votes; a tie goes to whichever tied seat was
/// named first in recorded order.
pub fn wolf_target_from_votes(votes: &[WolfVote]) -> Option<Seat> {
    let mut counts: BTreeMap<Seat, u32> = BTreeMap::new();
    for v in votes {
        *counts.entry(v.target).or_default() += 1;
    }
    let max = counts.values().copied().max()?;
    votes
        .iter()
        .map(|v| v.target)
        .find(|t| counts.get(t) == Some(&max))
}

pub fn witch(state: &mut GameState, seat: Seat, choice: WitchChoice) -> Result<(), DomainError> {
    expect_actor(
        state,
        Phase::NightWitchAction,
        state.living_holder(Role::Witch),
        seat,
        "witch choice",
    )?;
    match choice {
        WitchChoice::Pass => {}
        WitchChoice::Save => {
            if state.role_abilities.witch_heal_used {
                return Err(DomainError::rejected(
                    RejectKind::AbilityUsed,
                    "healing potion already used",
                ));
            }
            if state.night_actions.wolf_target.is_none() {
                return Err(DomainError::rejected(
                    RejectKind::InvalidTarget,
                    "no wolf target to heal",
                ));
            }
            state.night_actions.witch_save = true;
            state.role_abilities.witch_heal_used = true;
        }
        WitchChoice::Poison { target } => {
            if state.role_abilities.witch_poison_used {
                return Err(DomainError::rejected(
                    RejectKind::AbilityUsed,
                    "poison already used",
                ));
            }
            if target == seat {
                return Err(DomainError::invalid_target(target, "cannot poison own seat"));
            }
            if !state.is_alive(target) {
                return Err(DomainError::invalid_target(target, "not alive"));
            }
            state.night_actions.witch_poison = Some(target);
            state.role_abilities.witch_poison_used = true;
        }
    }
    Ok(())
}

pub fn seer(state: &mut GameState, seat: Seat, target: Seat) -> Result<(), DomainError> {
    expect_actor(
        state,
        Phase::NightSeerAction,
        state.living_holder(Role::Seer),
        seat,
        "seer check",
    )?;
    if target == seat {
        return Err(DomainError::invalid_target(target, "cannot check own seat"));
    }
    let result = match state.player(target) {
        Some(p) if p.alive => p.alignment(),
        _ => return Err(DomainError::invalid_target(target, "not alive")),
    };
    let day = state.day;
    let night = &mut state.night_actions;
    night.seer_target = Some(target);
    night.seer_result = Some(result);
    night.seer_history.push(SeerCheck {
        day,
        target,
        result,
    });
    Ok(())
}

/// Result of running night resolution for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightOutcome {
    /// A record for this day already exists; nothing was applied.
    AlreadyResolved,
    Resolved { hunter: Option<HunterTrigger> },
}

/// Applies the night's deaths and writes the `NightRecord`.
///
/// | guarded == target | save | outcome |
/// |---|---|---|
/// | yes | yes | dies (milk), Hunter ability lost |
/// | yes | no  | survives |
/// | no  | yes | survives |
/// | no  | no  | dies (wolf attack) |
///
/// Poison is additive and always removes the Hunter ability from its target.
pub fn resolve_night(state: &mut GameState) -> NightOutcome {
    if state.night_history.contains_key(&state.day) {
        return NightOutcome::AlreadyResolved;
    }
    let actions = state.night_actions.clone();
    let mut deaths: Vec<Death> = Vec::new();

    if let Some(victim) = actions.wolf_target {
        let guarded = actions.guard_target == Some(victim);
        match (guarded, actions.witch_save) {
            (true, true) => deaths.push(Death {
                seat: victim,
                cause: DeathCause::Milk,
            }),
            (false, false) => deaths.push(Death {
                seat: victim,
                cause: DeathCause::WolfAttack,
            }),
            _ => {}
        }
    }
    if let Some(target) = actions.witch_poison {
        if !deaths.iter().any(|d| d.seat == target) {
            deaths.push(Death {
                seat: target,
                cause: DeathCause::Poison,
            });
        }
        if state.role_of(target) == Some(Role::Hunter) {
            state.role_abilities.hunter_can_shoot = false;
        }
    }

    let mut hunter = None;
    for death in &deaths {
        state.kill(death.seat);
        if state.role_of(death.seat) != Some(Role::Hunter) {
            continue;
        }
        match death.cause {
            DeathCause::Milk | DeathCause::Poison => {
                state.role_abilities.hunter_can_shoot = false;
            }
            DeathCause::WolfAttack if state.role_abilities.hunter_can_shoot => {
                hunter = Some(HunterTrigger {
                    seat: death.seat,
                    resume: Phase::DayStart,
                });
            }
            _ => {}
        }
    }

    let record = NightRecord {
        peaceful: deaths.is_empty(),
        deaths,
        guard_target: actions.guard_target,
        wolf_target: actions.wolf_target,
        witch_save: actions.witch_save,
        witch_poison: actions.witch_poison,
        seer_target: actions.seer_target,
        hunter_shot: None,
    };
    state.night_history.insert(state.day, record);
    NightOutcome::Resolved { hunter }
}
