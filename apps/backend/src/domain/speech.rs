//! Speech turns: day lap, last words and wolf chat.

use rand::Rng;

use crate::domain::phase::Phase;
use crate::domain::seed_derivation::{derive_speech_seed, rng_from};
use crate::domain::state::{GameState, Seat, SpeechKind, SpeechTurn};
use crate::errors::domain::{DomainError, RejectKind};

/// Shown when an autonomous speaker produces nothing usable.
pub const PLACEHOLDER_FRAGMENT: &str = "...";

pub fn kind_for_phase(phase: Phase) -> Option<SpeechKind> {
    match phase {
        Phase::DaySpeech => Some(SpeechKind::Day),
        Phase::DayLastWords => Some(SpeechKind::LastWords),
        Phase::NightWolfChat => Some(SpeechKind::WolfChat),
        _ => None,
    }
}

pub(crate) fn begin_turn(state: &mut GameState, seat: Seat, kind: SpeechKind) {
    state.speech.turn = Some(SpeechTurn::new(seat, kind));
    state.current_speaker_seat = Some(seat);
}

pub(crate) fn clear_turn(state: &mut GameState) {
    state.speech.turn = None;
    state.current_speaker_seat = None;
}

/// Seeded uniform choice among living seats.
pub fn pick_lap_start(state: &GameState) -> Option<Seat> {
    let living = state.living_seats();
    if living.is_empty() {
        return None;
    }
    let mut rng = rng_from(derive_speech_seed(state.rng_seed, state.day));
    let idx = rng.random_range(0..living.len());
    living.get(idx).copied()
}

/// Next living seat after `from`, ascending with wrap. `None` once the walk
/// comes back round to the lap start.
pub fn next_lap_speaker(state: &GameState, from: Seat) -> Option<Seat> {
    let n = state.players.len();
    let lap_start = state.speech.lap_start;
    (1..=n)
        .map(|step| ((from as usize + step) % n) as Seat)
        .take_while(|s| Some(*s) != lap_start)
        .find(|s| state.is_alive(*s))
}

/// The open turn, checked against the submitting seat.
fn own_turn(state: &GameState, seat: Seat, label: &str) -> Result<SpeechKind, DomainError> {
    let Some(kind) = kind_for_phase(state.phase) else {
        return Err(DomainError::phase_mismatch(label, state.phase));
    };
    let Some(turn) = state.speech.turn.as_ref() else {
        return Err(DomainError::out_of_turn(seat, state.phase));
    };
    if turn.seat != seat || turn.kind != kind {
        return Err(DomainError::out_of_turn(seat, state.phase));
    }
    if kind != SpeechKind::LastWords && !state.is_alive(seat) {
        return Err(DomainError::rejected(
            RejectKind::ActorDead,
            format!("seat {seat} is dead"),
        ));
    }
    Ok(kind)
}

/// One fragment typed by a speaker who reveals as they go.
pub fn submit_fragment(state: &mut GameState, seat: Seat, text: &str) -> Result<(), DomainError> {
    let kind = own_turn(state, seat, "speech fragment")?;
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::validation("speech fragment is empty"));
    }
    if let Some(turn) = state.speech.turn.as_mut() {
        turn.fragments.push(text.to_string());
        turn.revealed = turn.fragments.len();
    }
    state.push_message(Some(seat), kind.message_kind(), text);
    Ok(())
}

pub fn check_can_finish(state: &GameState, seat: Seat) -> Result<(), DomainError> {
    own_turn(state, seat, "finish speaking").map(|_| ())
}

/// Stores a whole generated speech. Wolf chat is appended at once and the
/// turn ends; other kinds reveal the first fragment now and the rest on
/// each advance.
///
/// Returns true when the turn is finished.
pub fn store_generated(
    state: &mut GameState,
    seat: Seat,
    fragments: &[String],
) -> Result<bool, DomainError> {
    let kind = own_turn(state, seat, "generated speech")?;
    if state
        .speech
        .turn
        .as_ref()
        .is_some_and(SpeechTurn::is_generated)
    {
        return Err(DomainError::rejected(
            RejectKind::OutOfTurn,
            format!("seat {seat} already spoke"),
        ));
    }
    let cleaned: Vec<String> = fragments
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if cleaned.is_empty() {
        return Err(DomainError::validation("generated speech is empty"));
    }

    if kind == SpeechKind::WolfChat {
        for text in &cleaned {
            state.push_message(Some(seat), kind.message_kind(), text.clone());
        }
        if let Some(turn) = state.speech.turn.as_mut() {
            turn.revealed = cleaned.len();
            turn.fragments = cleaned;
        }
        return Ok(true);
    }

    let first = cleaned[0].clone();
    if let Some(turn) = state.speech.turn.as_mut() {
        turn.fragments = cleaned;
        turn.revealed = 1;
    }
    state.push_message(Some(seat), kind.message_kind(), first);
    Ok(false)
}

/// Presenter advance. Returns true when the speaker is done.
pub fn advance(state: &mut GameState) -> Result<bool, DomainError> {
    let Some(turn) = state.speech.turn.as_ref() else {
        return Err(DomainError::phase_mismatch("advance", state.phase));
    };
    if !turn.is_generated() || state.is_human(turn.seat) {
        return Err(DomainError::phase_mismatch("advance", state.phase));
    }
    if turn.revealed >= turn.fragments.len() {
        return Ok(true);
    }
    let (seat, kind, text) = (turn.seat, turn.kind, turn.fragments[turn.revealed].clone());
    if let Some(turn) = state.speech.turn.as_mut() {
        turn.revealed += 1;
    }
    state.push_message(Some(seat), kind.message_kind(), text);
    Ok(false)
}

/// Closes the open turn and hands the floor on.
pub(crate) fn finish_turn(state: &mut GameState) {
    let Some(turn) = state.speech.turn.take() else {
        return;
    };
    match turn.kind {
        SpeechKind::WolfChat => {
            state.night_actions.wolf_chat_done.push(turn.seat);
            clear_turn(state);
        }
        SpeechKind::Day => match next_lap_speaker(state, turn.seat) {
            Some(next) => begin_turn(state, next, SpeechKind::Day),
            None => clear_turn(state),
        },
        SpeechKind::LastWords => clear_turn(state),
    }
}
