use crate::domain::roles::Alignment;
use crate::domain::state::GameState;

/// Runs after every death. `None` means the game continues.
pub fn check_winner(state: &GameState) -> Option<Alignment> {
    let (wolves, village) = state
        .players
        .iter()
        .filter(|p| p.alive)
        .fold((0usize, 0usize), |(w, v), p| {
            if p.is_wolf() {
                (w + 1, v)
            } else {
                (w, v + 1)
            }
        });
    if wolves == 0 {
        Some(Alignment::Village)
    } else if wolves >= village {
        Some(Alignment::Wolf)
    } else {
        None
    }
}
