//! Random decision service - makes uniformly random legal choices.
//!
//! [`RandomPlayer`] is the reference implementation of
//! [`DecisionService`](super::DecisionService): every answer is drawn from
//! the legal choice set in [`crate::domain::legal`], so it never triggers
//! the engine's fallback path. It is the default service for new games and
//! the baseline in simulations.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::prelude::*;

use super::trait_def::{AiError, DecisionService};
use crate::domain::events::WitchChoice;
use crate::domain::legal;
use crate::domain::roles::Role;
use crate::domain::state::{Day, GameState, Seat, SpeechKind};

const DAY_LINES: &[&str] = &[
    "I have nothing to hide.",
    "Someone here is lying to us.",
    "I am watching how people vote.",
    "Let us not rush this.",
    "I trust my instincts on this one.",
];

const LAST_WORDS_LINES: &[&str] = &[
    "You are making a mistake.",
    "Remember who pushed for this.",
    "Good luck, village.",
];

const WOLF_LINES: &[&str] = &[
    "Who is the threat tonight?",
    "Let us keep it quiet.",
    "I will follow your lead.",
];

/// Decision service that makes random legal choices.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::ai::RandomPlayer;
///
/// // Non-deterministic (uses system entropy)
/// let random_ai = RandomPlayer::new(None);
///
/// // Deterministic (uses seed for reproducible behavior)
/// let seeded_ai = RandomPlayer::new(Some(12345));
/// ```
pub struct RandomPlayer {
    /// `DecisionService` methods take `&self`; the RNG needs `&mut`.
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    pub const fn name() -> &'static str {
        Self::NAME
    }

    pub const fn version() -> &'static str {
        Self::VERSION
    }

    /// Create a new `RandomPlayer`.
    ///
    /// * `Some(seed)` - reproducible choices (tests, simulations)
    /// * `None` - system entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn pick<T: Clone>(&self, options: &[T], what: &str) -> Result<T, AiError> {
        if options.is_empty() {
            return Err(AiError::InvalidMove(format!("no legal {what} available")));
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        options
            .choose(&mut *rng)
            .cloned()
            .ok_or_else(|| AiError::Internal(format!("failed to choose random {what}")))
    }
}

#[async_trait]
impl DecisionService for RandomPlayer {
    async fn speak(
        &self,
        _state: &GameState,
        _seat: Seat,
        kind: SpeechKind,
    ) -> Result<Vec<String>, AiError> {
        let lines = match kind {
            SpeechKind::Day => DAY_LINES,
            SpeechKind::LastWords => LAST_WORDS_LINES,
            SpeechKind::WolfChat => WOLF_LINES,
        };
        let count = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
            rng.random_range(1..=2)
        };
        (0..count)
            .map(|_| self.pick(lines, "line").map(str::to_string))
            .collect()
    }

    async fn choose_vote(&self, state: &GameState, seat: Seat) -> Result<Seat, AiError> {
        self.pick(&legal::vote_targets(state, seat), "vote")
    }

    async fn choose_night_target(
        &self,
        state: &GameState,
        seat: Seat,
        role: Role,
    ) -> Result<Option<Seat>, AiError> {
        match role {
            Role::Guard => self.pick(&legal::guard_targets(state), "guard target"),
            Role::Werewolf => self.pick(&legal::wolf_targets(state), "wolf target").map(Some),
            Role::Seer => self
                .pick(&legal::seer_targets(state, seat), "seer target")
                .map(Some),
            other => Err(AiError::InvalidMove(format!("{other} has no night target"))),
        }
    }

    async fn choose_witch_action(
        &self,
        state: &GameState,
        seat: Seat,
    ) -> Result<WitchChoice, AiError> {
        self.pick(&legal::witch_choices(state, seat), "witch choice")
    }

    async fn choose_shot(&self, state: &GameState, seat: Seat) -> Result<Option<Seat>, AiError> {
        self.pick(&legal::shot_targets(state, seat), "shot")
    }

    async fn summarize_day(&self, state: &GameState, day: Day) -> Result<String, AiError> {
        let Some(record) = state.day_history.get(&day) else {
            return Err(AiError::InvalidMove(format!("day {day} has no record")));
        };
        let outcome = match record.eliminated {
            Some(seat) => format!("seat {seat} was voted out"),
            None if record.tied => "the vote tied".to_string(),
            None => "nobody was voted out".to_string(),
        };
        Ok(format!("Day {day}: {outcome}."))
    }
}
