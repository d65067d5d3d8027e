//! Decision service seam - how autonomous seats make choices.
//!
//! This module provides:
//! - `DecisionService` trait, the only way the engine asks for a choice
//! - `RandomPlayer`: uniform random legal choices (seedable for tests)
//! - `RemoteDecisionService`: choices from an external HTTP endpoint
//! - a static registry mapping names to factories

mod random;
pub mod registry;
mod remote;
mod trait_def;

pub use random::RandomPlayer;
pub use registry::{by_name, registered_ais, AiFactory, FactoryArgs};
pub use remote::{DecisionRequest, RemoteDecisionService};
pub use trait_def::{AiError, DecisionService};
