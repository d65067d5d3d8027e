//! Pure reducer: `(state, event) -> state`.
//!
//! `apply` validates and applies one event, then `settle` runs every
//! automatic step (phase entries, skipped roles, resolutions, win checks)
//! until the state waits on an actor. Every engine-driven phase change goes
//! through the edge table; a forbidden one surfaces as
//! `DomainError::IllegalTransition`.

use crate::domain::events::{GameEvent, NightAction, PlayerAction};
use crate::domain::night::{self, NightOutcome};
use crate::domain::phase::Phase;
use crate::domain::roles::{Alignment, Role};
use crate::domain::speech;
use crate::domain::state::{GameState, HunterTrigger, Seat, SpeechKind};
use crate::domain::turns::{next_wolf_chatter, next_wolf_voter};
use crate::domain::voting::{self, DayOutcome};
use crate::domain::win::check_winner;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, RejectKind};

const MAX_SETTLE_STEPS: usize = 128;

/// How a phase is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Along an edge of the phase table.
    Canonical,
    /// Privileged override; the caller owns the day counter.
    Forced,
}

pub fn apply(state: &GameState, event: &GameEvent) -> Result<GameState, DomainError> {
    if state.is_over() {
        return Err(DomainError::rejected(
            RejectKind::GameOver,
            "game has ended",
        ));
    }
    let mut next = state.clone();
    match event {
        GameEvent::Start => {
            if next.phase != Phase::Lobby {
                return Err(DomainError::phase_mismatch("start", next.phase));
            }
            transition(&mut next, Phase::Setup)?;
        }
        GameEvent::Act { seat, action } => act(&mut next, *seat, action)?,
        GameEvent::SpeechGenerated { seat, fragments } => {
            if speech::store_generated(&mut next, *seat, fragments)? {
                speech::finish_turn(&mut next);
            }
        }
        GameEvent::Advance => {
            if speech::advance(&mut next)? {
                speech::finish_turn(&mut next);
            }
        }
    }
    settle(next)
}

fn act(state: &mut GameState, seat: Seat, action: &PlayerAction) -> Result<(), DomainError> {
    if state.player(seat).is_none() {
        return Err(DomainError::not_found(
            NotFoundKind::Seat,
            format!("no seat {seat}"),
        ));
    }
    match action {
        PlayerAction::SpeechFragment { text } => speech::submit_fragment(state, seat, text),
        PlayerAction::FinishSpeaking => {
            speech::check_can_finish(state, seat)?;
            speech::finish_turn(state);
            Ok(())
        }
        PlayerAction::CastVote { target } => voting::cast_vote(state, seat, *target),
        PlayerAction::NightAction { action } => match *action {
            NightAction::Guard { target } => {
                night::guard(state, seat, target)?;
                transition(state, Phase::NightWolfChat)
            }
            NightAction::WolfVote { target } => night::wolf_vote(state, seat, target),
            NightAction::Witch { choice } => {
                night::witch(state, seat, choice)?;
                transition(state, Phase::NightSeerAction)
            }
            NightAction::SeerCheck { target } => {
                night::seer(state, seat, target)?;
                transition(state, Phase::NightResolve)
            }
            NightAction::HunterShoot { target } => hunter_shoot(state, seat, target),
        },
    }
}

fn hunter_shoot(state: &mut GameState, seat: Seat, target: Option<Seat>) -> Result<(), DomainError> {
    if state.phase != Phase::HunterShoot {
        return Err(DomainError::phase_mismatch("hunter shot", state.phase));
    }
    let Some(trigger) = state.pending_hunter.filter(|h| h.seat == seat) else {
        return Err(DomainError::out_of_turn(seat, state.phase));
    };
    if let Some(t) = target {
        if t == seat {
            return Err(DomainError::invalid_target(t, "cannot shoot own seat"));
        }
        if !state.is_alive(t) {
            return Err(DomainError::invalid_target(t, "not alive"));
        }
        state.kill(t);
        let day = state.day;
        if trigger.resume == Phase::DayStart {
            if let Some(record) = state.night_history.get_mut(&day) {
                record.hunter_shot = Some(t);
            }
        } else if let Some(record) = state.day_history.get_mut(&day) {
            record.hunter_shot = Some(t);
        }
        let (shooter, victim) = (name_of(state, seat), name_of(state, t));
        state.narrate(format!("{shooter} fires a last shot. {victim} is dead."));
    } else {
        let shooter = name_of(state, seat);
        state.narrate(format!("{shooter} lowers the rifle."));
    }
    state.role_abilities.hunter_can_shoot = false;
    state.pending_hunter = None;
    route_after_deaths(state, None, trigger.resume)
}

/// Runs automatic steps until the state waits on an actor or ends.
pub fn settle(mut state: GameState) -> Result<GameState, DomainError> {
    for _ in 0..MAX_SETTLE_STEPS {
        if !step(&mut state)? {
            return Ok(state);
        }
    }
    Err(DomainError::conflict(
        ConflictKind::Other("settle".to_string()),
        format!("settle did not converge in {:?}", state.phase),
    ))
}

/// One automatic step. Returns false when nothing more can happen without
/// outside input.
fn step(state: &mut GameState) -> Result<bool, DomainError> {
    match state.phase {
        Phase::Lobby | Phase::GameEnd => Ok(false),
        Phase::Setup => transition(state, Phase::NightStart).map(|_| true),
        Phase::NightStart => transition(state, Phase::NightGuardAction).map(|_| true),
        Phase::NightGuardAction => {
            if state.living_holder(Role::Guard).is_some() {
                return Ok(false);
            }
            transition(state, Phase::NightWolfChat).map(|_| true)
        }
        Phase::NightWolfChat => {
            if state.speech.turn.is_some() {
                return Ok(false);
            }
            match next_wolf_chatter(state) {
                Some(wolf) => speech::begin_turn(state, wolf, SpeechKind::WolfChat),
                None => transition(state, Phase::NightWolfAction)?,
            }
            Ok(true)
        }
        Phase::NightWolfAction => {
            if next_wolf_voter(state).is_some() {
                return Ok(false);
            }
            state.night_actions.wolf_target =
                night::wolf_target_from_votes(&state.night_actions.wolf_votes);
            transition(state, Phase::NightWitchAction).map(|_| true)
        }
        Phase::NightWitchAction => {
            let abilities = state.role_abilities;
            let spent = abilities.witch_heal_used && abilities.witch_poison_used;
            if state.living_holder(Role::Witch).is_some() && !spent {
                return Ok(false);
            }
            transition(state, Phase::NightSeerAction).map(|_| true)
        }
        Phase::NightSeerAction => {
            if state.living_holder(Role::Seer).is_some() {
                return Ok(false);
            }
            transition(state, Phase::NightResolve).map(|_| true)
        }
        Phase::NightResolve => {
            let hunter = match night::resolve_night(state) {
                NightOutcome::Resolved { hunter } => hunter,
                NightOutcome::AlreadyResolved => None,
            };
            route_after_deaths(state, hunter, Phase::DayStart).map(|_| true)
        }
        Phase::DayStart => transition(state, Phase::DaySpeech).map(|_| true),
        Phase::DaySpeech => {
            if state.speech.turn.is_some() {
                return Ok(false);
            }
            transition(state, Phase::DayVote).map(|_| true)
        }
        Phase::DayVote => {
            if !voting::all_living_voted(state) {
                return Ok(false);
            }
            transition(state, Phase::DayResolve).map(|_| true)
        }
        Phase::DayResolve => {
            match voting::resolve_day(state) {
                DayOutcome::Eliminated(seat) => {
                    let name = name_of(state, seat);
                    state.narrate(format!("The village has voted out {name}."));
                    if check_winner(state).is_some() {
                        finish(state)?;
                    } else {
                        state.last_words_seat = Some(seat);
                        transition(state, Phase::DayLastWords)?;
                    }
                }
                DayOutcome::NoElimination { tied } => {
                    state.narrate(if tied {
                        "The vote is tied. Nobody is eliminated."
                    } else {
                        "Nobody is eliminated."
                    });
                    transition(state, Phase::NightStart)?;
                }
                DayOutcome::AlreadyResolved => route_after_deaths(state, None, Phase::NightStart)?,
            }
            Ok(true)
        }
        Phase::DayLastWords => {
            if state.speech.turn.is_some() {
                return Ok(false);
            }
            let hunter = state
                .last_words_seat
                .take()
                .filter(|s| {
                    state.role_of(*s) == Some(Role::Hunter) && state.role_abilities.hunter_can_shoot
                })
                .map(|seat| HunterTrigger {
                    seat,
                    resume: Phase::NightStart,
                });
            route_after_deaths(state, hunter, Phase::NightStart).map(|_| true)
        }
        Phase::HunterShoot => {
            if state.pending_hunter.is_some() {
                return Ok(false);
            }
            transition(state, Phase::NightStart).map(|_| true)
        }
    }
}

/// Win check, then the Hunter if one is waiting, else `otherwise`.
fn route_after_deaths(
    state: &mut GameState,
    hunter: Option<HunterTrigger>,
    otherwise: Phase,
) -> Result<(), DomainError> {
    if check_winner(state).is_some() {
        return finish(state);
    }
    match hunter {
        Some(trigger) => {
            state.pending_hunter = Some(trigger);
            transition(state, Phase::HunterShoot)
        }
        None => transition(state, otherwise),
    }
}

fn finish(state: &mut GameState) -> Result<(), DomainError> {
    transition(state, Phase::GameEnd)
}

/// Moves along an edge of the phase table and runs the entry effects.
pub fn transition(state: &mut GameState, to: Phase) -> Result<(), DomainError> {
    state.phase.can_transition_to(to).into_result()?;
    enter_phase(state, to, Entry::Canonical)
}

/// Entry effects of `phase`, without consulting the edge table.
pub fn enter_phase(state: &mut GameState, phase: Phase, entry: Entry) -> Result<(), DomainError> {
    if phase == Phase::GameEnd && state.winner.is_none() {
        let Some(winner) = check_winner(state) else {
            return Err(DomainError::validation("game is not decided"));
        };
        state.winner = Some(winner);
    }
    state.phase = phase;
    match phase {
        Phase::NightStart => {
            match entry {
                Entry::Canonical => state.day += 1,
                Entry::Forced => state.day = state.day.max(1),
            }
            state.night_actions = state.night_actions.next_night();
            state.last_words_seat = None;
            speech::clear_turn(state);
            state.speech.lap_start = None;
            let day = state.day;
            state.narrate(format!("Night {day} falls."));
        }
        Phase::NightWolfChat | Phase::NightWolfAction | Phase::HunterShoot => {
            speech::clear_turn(state);
        }
        Phase::DayStart => {
            speech::clear_turn(state);
            let text = dawn_narration(state);
            state.narrate(text);
        }
        Phase::DaySpeech => {
            speech::clear_turn(state);
            state.speech.lap_start = speech::pick_lap_start(state);
            if let Some(first) = state.speech.lap_start {
                speech::begin_turn(state, first, SpeechKind::Day);
            }
        }
        Phase::DayVote => {
            speech::clear_turn(state);
            state.votes.clear();
        }
        Phase::DayLastWords => {
            speech::clear_turn(state);
            if let Some(seat) = state.last_words_seat {
                speech::begin_turn(state, seat, SpeechKind::LastWords);
            }
        }
        Phase::GameEnd => {
            speech::clear_turn(state);
            state.pending_hunter = None;
            let text = match state.winner {
                Some(Alignment::Village) => "The village has rooted out every werewolf.",
                _ => "The werewolves have overrun the village.",
            };
            state.narrate(text);
        }
        Phase::Lobby
        | Phase::Setup
        | Phase::NightGuardAction
        | Phase::NightWitchAction
        | Phase::NightSeerAction
        | Phase::NightResolve
        | Phase::DayResolve => {}
    }
    Ok(())
}

fn dawn_narration(state: &GameState) -> String {
    let day = state.day;
    match state.night_history.get(&day) {
        Some(record) if record.peaceful => format!("Day {day} dawns after a peaceful night."),
        Some(record) => {
            let names: Vec<String> = record
                .deaths
                .iter()
                .map(|d| name_of(state, d.seat))
                .collect();
            format!("Day {day} dawns. Found dead: {}.", names.join(", "))
        }
        None => format!("Day {day} dawns."),
    }
}

fn name_of(state: &GameState, seat: Seat) -> String {
    state
        .player(seat)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("Seat {seat}"))
}
