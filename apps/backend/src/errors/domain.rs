//! Domain-level error type used across services and the HTTP boundary.
//!
//! This error type is HTTP-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::phase::Phase;
use crate::domain::state::Seat;

/// Why an action submission was refused.
///
/// A rejected action never mutates state; the caller gets the kind back
/// synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RejectKind {
    /// Seat is not the one the current sub-phase is waiting on.
    OutOfTurn,
    /// Action type does not belong to the current phase.
    PhaseMismatch,
    /// Acting seat is dead.
    ActorDead,
    /// Acting seat is driven by the decision service, not the human.
    NotHumanSeat,
    /// Target is not in the legal target set.
    InvalidTarget,
    /// Single-use ability already spent.
    AbilityUsed,
    /// Game has ended; state is read-only.
    GameOver,
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Seat,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// A newer flow epoch superseded the write.
    Superseded,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/setup validation or business rule violation
    Validation(String),
    /// Action submission refused without mutation
    Rejected(RejectKind, String),
    /// Transition not present in the phase table
    IllegalTransition { from: Phase, to: Phase },
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::Rejected(kind, d) => write!(f, "action rejected {kind:?}: {d}"),
            DomainError::IllegalTransition { from, to } => {
                write!(f, "illegal transition {from:?} -> {to:?}")
            }
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn rejected(kind: RejectKind, detail: impl Into<String>) -> Self {
        Self::Rejected(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn out_of_turn(seat: Seat, phase: Phase) -> Self {
        Self::rejected(
            RejectKind::OutOfTurn,
            format!("seat {seat} is not expected to act in {phase:?}"),
        )
    }

    pub fn phase_mismatch(action: &str, phase: Phase) -> Self {
        Self::rejected(
            RejectKind::PhaseMismatch,
            format!("{action} is not accepted in {phase:?}"),
        )
    }

    pub fn invalid_target(target: Seat, reason: &str) -> Self {
        Self::rejected(
            RejectKind::InvalidTarget,
            format!("seat {target} is not a legal target: {reason}"),
        )
    }

    /// True for errors that represent a refused action (taxonomy class c).
    pub fn is_rejection(&self) -> bool {
        matches!(self, DomainError::Rejected(..))
    }
}
