//! Phase machine: the sixteen phases and the explicit edge table.

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Game created, roles dealt, not yet started.
    Lobby,
    /// One-shot setup step between lobby and the first night.
    Setup,
    /// Night bookkeeping reset; `day` is incremented on entry.
    NightStart,
    NightGuardAction,
    /// Private wolf discussion, one turn per living wolf.
    NightWolfChat,
    /// Sequential wolf vote producing the night's target.
    NightWolfAction,
    NightWitchAction,
    NightSeerAction,
    /// Death causation for the night; runs at most once per day.
    NightResolve,
    DayStart,
    /// One lap of speeches starting from a seeded random living seat.
    DaySpeech,
    DayLastWords,
    DayVote,
    DayResolve,
    /// A dead Hunter may fire one shot.
    HunterShoot,
    /// Terminal. Every further event is rejected.
    GameEnd,
}

/// Outcome of consulting the edge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    Allowed,
    Forbidden { from: Phase, to: Phase },
}

impl TransitionCheck {
    pub fn is_allowed(self) -> bool {
        matches!(self, TransitionCheck::Allowed)
    }

    /// Converts a forbidden check into the domain error engine callers receive.
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            TransitionCheck::Allowed => Ok(()),
            TransitionCheck::Forbidden { from, to } => {
                Err(DomainError::IllegalTransition { from, to })
            }
        }
    }
}

impl Phase {
    pub const ALL: [Phase; 16] = [
        Phase::Lobby,
        Phase::Setup,
        Phase::NightStart,
        Phase::NightGuardAction,
        Phase::NightWolfChat,
        Phase::NightWolfAction,
        Phase::NightWitchAction,
        Phase::NightSeerAction,
        Phase::NightResolve,
        Phase::DayStart,
        Phase::DaySpeech,
        Phase::DayLastWords,
        Phase::DayVote,
        Phase::DayResolve,
        Phase::HunterShoot,
        Phase::GameEnd,
    ];

    /// Canonical successors of this phase.
    pub fn successors(self) -> &'static [Phase] {
        use Phase::*;
        match self {
            Lobby => &[Setup],
            Setup => &[NightStart],
            NightStart => &[NightGuardAction],
            NightGuardAction => &[NightWolfChat],
            NightWolfChat => &[NightWolfAction],
            NightWolfAction => &[NightWitchAction],
            NightWitchAction => &[NightSeerAction],
            NightSeerAction => &[NightResolve],
            NightResolve => &[DayStart, HunterShoot, GameEnd],
            DayStart => &[DaySpeech],
            DaySpeech => &[DayVote],
            DayVote => &[DayResolve],
            DayResolve => &[DayLastWords, HunterShoot, NightStart, GameEnd],
            DayLastWords => &[HunterShoot, NightStart, GameEnd],
            HunterShoot => &[DayStart, NightStart, GameEnd],
            GameEnd => &[],
        }
    }

    pub fn can_transition_to(self, to: Phase) -> TransitionCheck {
        if self.successors().contains(&to) {
            TransitionCheck::Allowed
        } else {
            TransitionCheck::Forbidden { from: self, to }
        }
    }

    #[inline]
    pub fn is_night(self) -> bool {
        matches!(
            self,
            Phase::NightStart
                | Phase::NightGuardAction
                | Phase::NightWolfChat
                | Phase::NightWolfAction
                | Phase::NightWitchAction
                | Phase::NightSeerAction
                | Phase::NightResolve
        )
    }

    /// Stable discriminator used when deriving per-phase seeds.
    pub fn ordinal(self) -> u8 {
        Phase::ALL
            .iter()
            .position(|p| *p == self)
            .map(|i| i as u8)
            .unwrap_or(u8::MAX)
    }
}
