//! Inputs to the reducer.

use serde::{Deserialize, Serialize};

use crate::domain::state::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WitchChoice {
    Pass,
    /// Heal the wolves' target.
    Save,
    Poison { target: Seat },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NightAction {
    /// `None` passes.
    Guard { target: Option<Seat> },
    WolfVote { target: Seat },
    Witch { choice: WitchChoice },
    SeerCheck { target: Seat },
    /// `None` declines the shot.
    HunterShoot { target: Option<Seat> },
}

/// A seat's submission. Exactly one per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerAction {
    SpeechFragment { text: String },
    FinishSpeaking,
    CastVote { target: Seat },
    NightAction { action: NightAction },
}

impl PlayerAction {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerAction::SpeechFragment { .. } => "speech fragment",
            PlayerAction::FinishSpeaking => "finish speaking",
            PlayerAction::CastVote { .. } => "vote",
            PlayerAction::NightAction { action } => match action {
                NightAction::Guard { .. } => "guard protect",
                NightAction::WolfVote { .. } => "wolf vote",
                NightAction::Witch { .. } => "witch choice",
                NightAction::SeerCheck { .. } => "seer check",
                NightAction::HunterShoot { .. } => "hunter shot",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    /// Leaves the lobby.
    Start,
    Act { seat: Seat, action: PlayerAction },
    /// Whole speech produced by the decision service for an autonomous seat.
    SpeechGenerated { seat: Seat, fragments: Vec<String> },
    /// Presenter reveals the next fragment of an autonomous speech.
    Advance,
}
