//! Day voting and day resolution.

use std::collections::BTreeMap;

use crate::domain::phase::Phase;
use crate::domain::state::{DayRecord, GameState, Seat};
use crate::errors::domain::{DomainError, RejectKind};

pub fn cast_vote(state: &mut GameState, voter: Seat, target: Seat) -> Result<(), DomainError> {
    if state.phase != Phase::DayVote {
        return Err(DomainError::phase_mismatch("vote", state.phase));
    }
    if !state.is_alive(voter) {
        return Err(DomainError::rejected(
            RejectKind::ActorDead,
            format!("seat {voter} is dead"),
        ));
    }
    if state.votes.contains_key(&voter) {
        return Err(DomainError::rejected(
            RejectKind::OutOfTurn,
            format!("seat {voter} already voted today"),
        ));
    }
    if target == voter {
        return Err(DomainError::invalid_target(target, "cannot vote for yourself"));
    }
    if !state.is_alive(target) {
        return Err(DomainError::invalid_target(target, "not alive"));
    }
    state.votes.insert(voter, target);
    Ok(())
}

pub fn all_living_voted(state: &GameState) -> bool {
    state
        .living_seats()
        .iter()
        .all(|s| state.votes.contains_key(s))
}

pub fn tally(votes: &BTreeMap<Seat, Seat>) -> BTreeMap<Seat, u32> {
    let mut counts = BTreeMap::new();
    for target in votes.values() {
        *counts.entry(*target).or_default() += 1;
    }
    counts
}

/// Strict single maximum, or `(None, tied)`.
pub fn elimination(tally: &BTreeMap<Seat, u32>) -> (Option<Seat>, bool) {
    let Some(max) = tally.values().copied().max() else {
        return (None, false);
    };
    let leaders: Vec<Seat> = tally
        .iter()
        .filter(|(_, n)| **n == max)
        .map(|(s, _)| *s)
        .collect();
    match leaders.as_slice() {
        [only] => (Some(*only), false),
        _ => (None, true),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    AlreadyResolved,
    Eliminated(Seat),
    /// Tie at the maximum or no votes at all.
    NoElimination { tied: bool },
}

/// Archives the day's votes, writes the `DayRecord` and applies the
/// elimination. At most once per day.
pub fn resolve_day(state: &mut GameState) -> DayOutcome {
    if state.day_history.contains_key(&state.day) {
        return DayOutcome::AlreadyResolved;
    }
    let counts = tally(&state.votes);
    let (eliminated, tied) = elimination(&counts);
    state.vote_history.insert(state.day, state.votes.clone());
    state.day_history.insert(
        state.day,
        DayRecord {
            tally: counts,
            eliminated,
            tied,
            hunter_shot: None,
            summary: None,
        },
    );
    match eliminated {
        Some(seat) => {
            state.kill(seat);
            DayOutcome::Eliminated(seat)
        }
        None => DayOutcome::NoElimination { tied },
    }
}
