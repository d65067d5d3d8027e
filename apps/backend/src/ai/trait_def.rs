//! Decision service trait definition.

use std::fmt;

use async_trait::async_trait;

use crate::domain::events::WitchChoice;
use crate::domain::roles::Role;
use crate::domain::state::{Day, GameState, Seat, SpeechKind};

/// Errors that can occur during a decision.
#[derive(Debug)]
pub enum AiError {
    /// Decision was not produced in time
    Timeout,
    /// Decision service encountered an internal error
    Internal(String),
    /// Decision service produced an unusable choice
    InvalidMove(String),
    /// Decision service does not offer this request kind
    Unsupported(&'static str),
    /// Remote call failed before a response was parsed
    Transport(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Timeout => write!(f, "decision timeout"),
            AiError::Internal(msg) => write!(f, "decision internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "decision invalid move: {msg}"),
            AiError::Unsupported(what) => write!(f, "decision request unsupported: {what}"),
            AiError::Transport(msg) => write!(f, "decision transport error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

/// Produces choices for autonomous seats.
///
/// Implementations receive the full authoritative state plus the seat they
/// act for. They are expected to stay within what that seat may know; the
/// engine validates every answer and falls back to a random legal choice
/// when the answer is unusable.
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// Speech fragments for a day speech, last words, or a wolf chat line.
    async fn speak(
        &self,
        state: &GameState,
        seat: Seat,
        kind: SpeechKind,
    ) -> Result<Vec<String>, AiError>;

    /// Day vote target.
    async fn choose_vote(&self, state: &GameState, seat: Seat) -> Result<Seat, AiError>;

    /// Night target for the Guard, a wolf, or the Seer. `None` is a pass and
    /// is only legal for the Guard.
    async fn choose_night_target(
        &self,
        state: &GameState,
        seat: Seat,
        role: Role,
    ) -> Result<Option<Seat>, AiError>;

    async fn choose_witch_action(
        &self,
        state: &GameState,
        seat: Seat,
    ) -> Result<WitchChoice, AiError>;

    /// Hunter's last shot. `None` declines.
    async fn choose_shot(&self, state: &GameState, seat: Seat) -> Result<Option<Seat>, AiError>;

    /// Narrative recap of one day. Optional.
    async fn summarize_day(&self, _state: &GameState, _day: Day) -> Result<String, AiError> {
        Err(AiError::Unsupported("summarize_day"))
    }
}
