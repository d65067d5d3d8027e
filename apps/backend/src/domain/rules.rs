//! Table rules: seat limits, role decks and the initial deal.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::domain::phase::Phase;
use crate::domain::roles::{Alignment, Role};
use crate::domain::seed_derivation::{derive_role_seed, rng_from};
use crate::domain::state::{
    GameState, NightActions, Player, RoleAbilities, Seat, SpeechState,
};
use crate::errors::domain::DomainError;

pub const MIN_SEATS: u8 = 6;
pub const MAX_SEATS: u8 = 12;

/// Special roles in the order they are added to a standard deck.
const SPECIALS: [Role; 4] = [Role::Seer, Role::Witch, Role::Hunter, Role::Guard];

/// Parameters for a new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSetup {
    pub seat_count: u8,
    pub human_seat: Seat,
    /// Display names by seat; defaults to "Player N" when empty.
    #[serde(default)]
    pub names: Vec<String>,
    /// Custom deck; the standard deck for `seat_count` when absent.
    #[serde(default)]
    pub deck: Option<Vec<Role>>,
    /// Decision profiles by seat, forwarded untouched.
    #[serde(default)]
    pub profiles: Vec<String>,
}

impl TableSetup {
    pub fn standard(seat_count: u8, human_seat: Seat) -> Self {
        Self {
            seat_count,
            human_seat,
            names: Vec::new(),
            deck: None,
            profiles: Vec::new(),
        }
    }
}

/// Standard deck: a third of the table are wolves, up to four specials,
/// and at least one plain villager.
pub fn standard_deck(seat_count: u8) -> Result<Vec<Role>, DomainError> {
    if !(MIN_SEATS..=MAX_SEATS).contains(&seat_count) {
        return Err(DomainError::validation(format!(
            "seat count {seat_count} outside {MIN_SEATS}..={MAX_SEATS}"
        )));
    }
    let n = seat_count as usize;
    let wolves = n / 3;
    let village = n - wolves;
    let specials = SPECIALS.len().min(village - 1);

    let mut deck = vec![Role::Werewolf; wolves];
    deck.extend_from_slice(&SPECIALS[..specials]);
    deck.resize(n, Role::Villager);
    Ok(deck)
}

pub fn validate_deck(deck: &[Role], seat_count: u8) -> Result<(), DomainError> {
    if deck.len() != seat_count as usize {
        return Err(DomainError::validation(format!(
            "deck has {} roles for {seat_count} seats",
            deck.len()
        )));
    }
    let wolves = deck
        .iter()
        .filter(|r| r.alignment() == Alignment::Wolf)
        .count();
    if wolves == 0 {
        return Err(DomainError::validation("deck needs at least one werewolf"));
    }
    if deck.len() - wolves <= wolves {
        return Err(DomainError::validation(
            "villagers must outnumber werewolves",
        ));
    }
    let mut singles: BTreeMap<Role, usize> = BTreeMap::new();
    for role in deck.iter().filter(|r| SPECIALS.contains(r)) {
        *singles.entry(*role).or_default() += 1;
    }
    if let Some((role, _)) = singles.into_iter().find(|(_, n)| *n > 1) {
        return Err(DomainError::validation(format!(
            "at most one {role} per table"
        )));
    }
    Ok(())
}

/// Checks the structural invariants of a state arriving from outside
/// (save/resume): seats `0..N` in order, exactly one human, and every seat
/// reference inside the table.
pub fn validate_snapshot(state: &GameState) -> Result<(), DomainError> {
    let n = state.players.len();
    if !(MIN_SEATS as usize..=MAX_SEATS as usize).contains(&n) {
        return Err(DomainError::validation(format!(
            "snapshot has {n} players, expected {MIN_SEATS}..={MAX_SEATS}"
        )));
    }
    if let Some((i, p)) = state
        .players
        .iter()
        .enumerate()
        .find(|(i, p)| p.seat as usize != *i)
    {
        return Err(DomainError::validation(format!(
            "player at position {i} claims seat {}",
            p.seat
        )));
    }
    let humans = state.players.iter().filter(|p| p.is_human).count();
    if humans != 1 {
        return Err(DomainError::validation(format!(
            "snapshot has {humans} human seats, expected exactly one"
        )));
    }

    let in_range = |seat: Seat| (seat as usize) < n;
    let referenced = state
        .votes
        .iter()
        .flat_map(|(voter, target)| [*voter, *target])
        .chain(state.current_speaker_seat)
        .chain(state.last_words_seat)
        .chain(state.pending_hunter.map(|h| h.seat))
        .chain(state.speech.lap_start);
    if let Some(bad) = referenced.into_iter().find(|s| !in_range(*s)) {
        return Err(DomainError::validation(format!(
            "snapshot references seat {bad} outside the table"
        )));
    }

    if (state.phase == Phase::GameEnd) != state.winner.is_some() {
        return Err(DomainError::validation(
            "winner must be set exactly when the game has ended",
        ));
    }
    Ok(())
}

/// Builds the lobby state for a new game with roles dealt from `rng_seed`.
pub fn deal_table(
    game_id: impl Into<String>,
    rng_seed: u64,
    setup: &TableSetup,
) -> Result<GameState, DomainError> {
    if !(MIN_SEATS..=MAX_SEATS).contains(&setup.seat_count) {
        return Err(DomainError::validation(format!(
            "seat count {} outside {MIN_SEATS}..={MAX_SEATS}",
            setup.seat_count
        )));
    }
    let mut deck = match &setup.deck {
        Some(custom) => {
            validate_deck(custom, setup.seat_count)?;
            custom.clone()
        }
        None => standard_deck(setup.seat_count)?,
    };
    if setup.human_seat >= setup.seat_count {
        return Err(DomainError::validation(format!(
            "human seat {} out of range",
            setup.human_seat
        )));
    }
    for (field, len) in [("names", setup.names.len()), ("profiles", setup.profiles.len())] {
        if len != 0 && len != setup.seat_count as usize {
            return Err(DomainError::validation(format!(
                "{field} must be empty or have one entry per seat"
            )));
        }
    }

    let mut rng = rng_from(derive_role_seed(rng_seed));
    deck.shuffle(&mut rng);

    let players = deck
        .into_iter()
        .enumerate()
        .map(|(i, role)| {
            let seat = i as Seat;
            Player {
                seat,
                name: setup
                    .names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Player {}", i + 1)),
                role,
                alive: true,
                is_human: seat == setup.human_seat,
                decision_profile: setup.profiles.get(i).cloned().unwrap_or_default(),
            }
        })
        .collect();

    Ok(GameState {
        game_id: game_id.into(),
        rng_seed,
        phase: Phase::Lobby,
        day: 0,
        players,
        messages: Vec::new(),
        current_speaker_seat: None,
        speech: SpeechState::default(),
        votes: BTreeMap::new(),
        vote_history: BTreeMap::new(),
        night_actions: NightActions::default(),
        night_history: BTreeMap::new(),
        day_history: BTreeMap::new(),
        role_abilities: RoleAbilities::default(),
        pending_hunter: None,
        last_words_seat: None,
        winner: None,
    })
}
