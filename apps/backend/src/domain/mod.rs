//! Domain layer: pure game logic types and helpers.

pub mod events;
pub mod flow;
pub mod legal;
pub mod night;
pub mod overrides;
pub mod phase;
pub mod player_view;
pub mod roles;
pub mod rules;
pub mod seed_derivation;
pub mod speech;
pub mod state;
pub mod turns;
pub mod voting;
pub mod win;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_day;
#[cfg(test)]
mod tests_flow;
#[cfg(test)]
mod tests_night;

// Re-exports for ergonomics
pub use events::{GameEvent, NightAction, PlayerAction, WitchChoice};
pub use flow::{apply, settle};
pub use overrides::{reconcile, OverrideRequest, ReconcileMode, ReconcileReport};
pub use phase::{Phase, TransitionCheck};
pub use player_view::PlayerView;
pub use roles::{Alignment, Role};
pub use rules::{deal_table, TableSetup};
pub use state::{GameState, Seat, SpeechKind};
pub use turns::{pending_action, ActionKind, PendingAction};
