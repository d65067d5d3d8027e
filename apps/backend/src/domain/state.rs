use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::phase::Phase;
use crate::domain::roles::{Alignment, Role};

pub type Seat = u8;
pub type Day = u32;

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
    pub role: Role,
    /// One-way: once false it never becomes true again.
    pub alive: bool,
    pub is_human: bool,
    /// Opaque to the engine; forwarded to the decision service.
    #[serde(default)]
    pub decision_profile: String,
}

impl Player {
    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.role.alignment()
    }

    #[inline]
    pub fn is_wolf(&self) -> bool {
        self.alignment() == Alignment::Wolf
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WolfVote {
    pub wolf: Seat,
    pub target: Seat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerCheck {
    pub day: Day,
    pub target: Seat,
    pub result: Alignment,
}

/// Transient per-night bookkeeping. Reset on every `NightStart`
/// except for `last_guard_target` and `seer_history`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActions {
    pub guard_target: Option<Seat>,
    pub last_guard_target: Option<Seat>,
    /// Wolves that finished their chat turn, in completion order.
    pub wolf_chat_done: Vec<Seat>,
    /// Sequential wolf vote, in recorded order.
    pub wolf_votes: Vec<WolfVote>,
    pub wolf_target: Option<Seat>,
    pub witch_save: bool,
    pub witch_poison: Option<Seat>,
    pub seer_target: Option<Seat>,
    pub seer_result: Option<Alignment>,
    pub seer_history: Vec<SeerCheck>,
}

impl NightActions {
    /// Fresh actions for a new night, carrying over what persists.
    pub fn next_night(&self) -> Self {
        Self {
            last_guard_target: self.guard_target,
            seer_history: self.seer_history.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAbilities {
    pub witch_heal_used: bool,
    pub witch_poison_used: bool,
    pub hunter_can_shoot: bool,
}

impl Default for RoleAbilities {
    fn default() -> Self {
        Self {
            witch_heal_used: false,
            witch_poison_used: false,
            hunter_can_shoot: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeathCause {
    WolfAttack,
    /// Guarded and healed on the same night.
    Milk,
    Poison,
    Vote,
    HunterShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death {
    pub seat: Seat,
    pub cause: DeathCause,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightRecord {
    pub deaths: Vec<Death>,
    pub guard_target: Option<Seat>,
    pub wolf_target: Option<Seat>,
    pub witch_save: bool,
    pub witch_poison: Option<Seat>,
    pub seer_target: Option<Seat>,
    pub hunter_shot: Option<Seat>,
    pub peaceful: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Votes received per seat.
    pub tally: BTreeMap<Seat, u32>,
    pub eliminated: Option<Seat>,
    pub tied: bool,
    pub hunter_shot: Option<Seat>,
    /// Best-effort recap; absent when the decision service declines.
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Speech,
    LastWords,
    /// Visible to wolves only.
    WolfChat,
    Narration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub day: Day,
    pub phase: Phase,
    pub seat: Option<Seat>,
    pub kind: MessageKind,
    pub text: String,
}

/// What a speech turn is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeechKind {
    Day,
    LastWords,
    WolfChat,
}

impl SpeechKind {
    pub fn message_kind(self) -> MessageKind {
        match self {
            SpeechKind::Day => MessageKind::Speech,
            SpeechKind::LastWords => MessageKind::LastWords,
            SpeechKind::WolfChat => MessageKind::WolfChat,
        }
    }
}

/// The speaker currently holding the floor.
///
/// For autonomous speakers `fragments` is filled in one go by the decision
/// service and revealed one at a time; for the human it grows with each
/// submitted fragment and `revealed` tracks its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechTurn {
    pub seat: Seat,
    pub kind: SpeechKind,
    pub fragments: Vec<String>,
    pub revealed: usize,
}

impl SpeechTurn {
    pub fn new(seat: Seat, kind: SpeechKind) -> Self {
        Self {
            seat,
            kind,
            fragments: Vec::new(),
            revealed: 0,
        }
    }

    #[inline]
    pub fn is_generated(&self) -> bool {
        !self.fragments.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechState {
    /// First speaker of the current day lap.
    pub lap_start: Option<Seat>,
    pub turn: Option<SpeechTurn>,
}

/// A dead Hunter waiting to shoot, and where the flow resumes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunterTrigger {
    pub seat: Seat,
    pub resume: Phase,
}

/// Entire game container, sufficient for pure domain operations and for
/// save/resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: String,
    pub rng_seed: u64,
    pub phase: Phase,
    /// 0 during lobby and setup; incremented on every night.
    pub day: Day,
    /// Ordered by seat.
    pub players: Vec<Player>,
    pub messages: Vec<Message>,
    pub current_speaker_seat: Option<Seat>,
    pub speech: SpeechState,
    /// voter -> target, current day only.
    pub votes: BTreeMap<Seat, Seat>,
    pub vote_history: BTreeMap<Day, BTreeMap<Seat, Seat>>,
    pub night_actions: NightActions,
    pub night_history: BTreeMap<Day, NightRecord>,
    pub day_history: BTreeMap<Day, DayRecord>,
    pub role_abilities: RoleAbilities,
    pub pending_hunter: Option<HunterTrigger>,
    pub last_words_seat: Option<Seat>,
    pub winner: Option<Alignment>,
}

impl GameState {
    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat as usize)
    }

    pub fn player_mut(&mut self, seat: Seat) -> Option<&mut Player> {
        self.players.get_mut(seat as usize)
    }

    pub fn is_alive(&self, seat: Seat) -> bool {
        self.player(seat).is_some_and(|p| p.alive)
    }

    pub fn role_of(&self, seat: Seat) -> Option<Role> {
        self.player(seat).map(|p| p.role)
    }

    pub fn is_wolf(&self, seat: Seat) -> bool {
        self.player(seat).is_some_and(Player::is_wolf)
    }

    pub fn is_human(&self, seat: Seat) -> bool {
        self.player(seat).is_some_and(|p| p.is_human)
    }

    pub fn human_seat(&self) -> Option<Seat> {
        self.players.iter().find(|p| p.is_human).map(|p| p.seat)
    }

    /// Living seats in ascending order.
    pub fn living_seats(&self) -> Vec<Seat> {
        self.players
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.seat)
            .collect()
    }

    pub fn living_wolves(&self) -> Vec<Seat> {
        self.players
            .iter()
            .filter(|p| p.alive && p.is_wolf())
            .map(|p| p.seat)
            .collect()
    }

    /// Lowest living seat holding `role`.
    pub fn living_holder(&self, role: Role) -> Option<Seat> {
        self.players
            .iter()
            .find(|p| p.alive && p.role == role)
            .map(|p| p.seat)
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameEnd
    }

    pub fn push_message(&mut self, seat: Option<Seat>, kind: MessageKind, text: impl Into<String>) {
        self.messages.push(Message {
            day: self.day,
            phase: self.phase,
            seat,
            kind,
            text: text.into(),
        });
    }

    pub fn narrate(&mut self, text: impl Into<String>) {
        self.push_message(None, MessageKind::Narration, text);
    }

    /// Marks a seat dead. Returns false if it was already dead.
    pub(crate) fn kill(&mut self, seat: Seat) -> bool {
        match self.player_mut(seat) {
            Some(p) if p.alive => {
                p.alive = false;
                true
            }
            _ => false,
        }
    }
}
