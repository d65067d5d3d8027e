//! How to register a decision service
//!
//! 1) Implement `DecisionService` for your type in its module.
//! 2) Add a new `AiFactory` entry to the static list with stable `name` and `version`.
//! 3) Keep ordering stable; avoid side effects in constructors.
//! 4) Determinism: same seed ⇒ same behavior (where applicable).

use std::sync::Arc;

use crate::ai::{AiError, DecisionService, RandomPlayer, RemoteDecisionService};

/// Construction inputs a factory may use.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactoryArgs<'a> {
    pub seed: Option<u64>,
    pub url: Option<&'a str>,
}

/// Factory definition for constructing decision services.
pub struct AiFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(&FactoryArgs<'_>) -> Result<Arc<dyn DecisionService>, AiError>,
}

static AI_FACTORIES: &[AiFactory] = &[
    AiFactory {
        name: RandomPlayer::NAME,
        version: RandomPlayer::VERSION,
        make: make_random_player,
    },
    AiFactory {
        name: RemoteDecisionService::NAME,
        version: RemoteDecisionService::VERSION,
        make: make_remote,
    },
];

/// Returns the statically registered factories.
pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

/// Finds a registered factory by its name.
pub fn by_name(name: &str) -> Option<&'static AiFactory> {
    registered_ais().iter().find(|factory| factory.name == name)
}

fn make_random_player(args: &FactoryArgs<'_>) -> Result<Arc<dyn DecisionService>, AiError> {
    Ok(Arc::new(RandomPlayer::new(args.seed)))
}

fn make_remote(args: &FactoryArgs<'_>) -> Result<Arc<dyn DecisionService>, AiError> {
    let url = args
        .url
        .ok_or_else(|| AiError::Internal("remote decision service needs a URL".into()))?;
    Ok(Arc::new(RemoteDecisionService::new(url)))
}
