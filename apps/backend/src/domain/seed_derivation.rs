//! RNG seed derivation utilities for deterministic game behavior.
//!
//! Every random choice the engine makes (role deal, speech lap start,
//! fallback decisions) draws from a `ChaCha8Rng` seeded by one of these
//! functions, so a saved state resumed elsewhere makes the same choices.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::phase::Phase;
use crate::domain::state::{Day, Seat};

/// Seed for dealing roles at game creation.
pub fn derive_role_seed(game_seed: u64) -> u64 {
    game_seed.wrapping_add(0x5EED_0001)
}

/// Seed for choosing the day's speech lap start.
pub fn derive_speech_seed(game_seed: u64, day: Day) -> u64 {
    game_seed
        .wrapping_add((day as u64).wrapping_mul(1_000_003))
        .wrapping_add(2)
}

/// Seed for a fallback decision made on behalf of a seat.
///
/// Unique per (game, day, seat, phase) so two fallbacks on the same night
/// do not mirror each other.
pub fn derive_fallback_seed(game_seed: u64, day: Day, seat: Seat, phase: Phase) -> u64 {
    game_seed
        .wrapping_add((day as u64).wrapping_mul(1_000_003))
        .wrapping_add((seat as u64).wrapping_mul(10_007))
        .wrapping_add((phase.ordinal() as u64).wrapping_mul(101))
        .wrapping_add(3)
}

#[inline]
pub fn rng_from(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
