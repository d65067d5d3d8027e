use std::fmt;

use serde::{Deserialize, Serialize};

/// Faction a role belongs to; decides win-condition counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    Village,
    Wolf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Villager,
    Werewolf,
    Seer,
    Witch,
    Hunter,
    Guard,
}

impl Role {
    #[inline]
    pub fn alignment(self) -> Alignment {
        match self {
            Role::Werewolf => Alignment::Wolf,
            _ => Alignment::Village,
        }
    }

    /// Roles that act during the night, in resolution order.
    pub const NIGHT_ORDER: [Role; 4] = [Role::Guard, Role::Werewolf, Role::Witch, Role::Seer];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Villager => write!(f, "Villager"),
            Role::Werewolf => write!(f, "Werewolf"),
            Role::Seer => write!(f, "Seer"),
            Role::Witch => write!(f, "Witch"),
            Role::Hunter => write!(f, "Hunter"),
            Role::Guard => write!(f, "Guard"),
        }
    }
}
