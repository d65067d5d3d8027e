//! Error codes for the werewolf backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the werewolf backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Access denied (e.g. debug overrides disabled)
    Forbidden,

    // Request Validation
    /// Invalid game ID provided
    InvalidGameId,
    /// Invalid seat number
    InvalidSeat,
    /// Invalid table setup (seat count, role deck, human seat)
    InvalidSetup,
    /// Target is not a legal choice for this action
    InvalidTarget,
    /// Seat is not the expected actor
    OutOfTurn,
    /// Action does not belong to the current phase
    PhaseMismatch,
    /// Acting seat is no longer alive
    ActorDead,
    /// Acting seat is not the human seat
    NotHumanSeat,
    /// Single-use ability already spent
    AbilityUsed,
    /// Game already ended
    GameOver,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Invalid or missing HTTP header
    InvalidHeader,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// Player not found
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Work was superseded by a newer flow epoch
    FlowSuperseded,
    /// Requested phase transition is not in the transition table
    IllegalTransition,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Decision service failed
    DecisionServiceError,
    /// Internal server error
    Internal,
    /// Internal server error (explicit problem code)
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",

            // Request Validation
            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidSeat => "INVALID_SEAT",
            Self::InvalidSetup => "INVALID_SETUP",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::ActorDead => "ACTOR_DEAD",
            Self::NotHumanSeat => "NOT_HUMAN_SEAT",
            Self::AbilityUsed => "ABILITY_USED",
            Self::GameOver => "GAME_OVER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",

            // Resource Not Found
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::FlowSuperseded => "FLOW_SUPERSEDED",
            Self::IllegalTransition => "ILLEGAL_TRANSITION",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::DecisionServiceError => "DECISION_SERVICE_ERROR",
            Self::Internal => "INTERNAL",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
