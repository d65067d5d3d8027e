// Proptest generators for domain types.
// Generators build valid inputs by construction instead of filtering.

use proptest::prelude::*;

use crate::domain::rules::{TableSetup, MAX_SEATS, MIN_SEATS};
use crate::domain::state::Seat;

/// A standard table of any legal size with the human at any seat.
pub fn table_setup() -> impl Strategy<Value = TableSetup> {
    (MIN_SEATS..=MAX_SEATS).prop_flat_map(|n| {
        (0..n).prop_map(move |human| TableSetup::standard(n, human))
    })
}

pub fn game_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// The four inputs to night death causation on the six-seat fixture
/// (wolves at 0 and 1, Witch at 3).
#[derive(Debug, Clone, Copy)]
pub struct NightInputs {
    pub guard: Option<Seat>,
    pub wolf_target: Seat,
    pub save: bool,
    pub poison: Option<Seat>,
}

pub fn night_inputs() -> impl Strategy<Value = NightInputs> {
    (
        proptest::option::of(0u8..6),
        2u8..6,
        any::<bool>(),
        proptest::option::of(prop_oneof![Just(0u8), Just(1), Just(2), Just(4), Just(5)]),
    )
        .prop_map(|(guard, wolf_target, save, poison)| NightInputs {
            guard,
            wolf_target,
            save,
            poison,
        })
}
