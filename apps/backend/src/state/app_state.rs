use std::sync::Arc;

use crate::config::EngineConfig;
use crate::services::games::GameRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub games: Arc<GameRegistry>,
    pub config: EngineConfig,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            games: Arc::new(GameRegistry::new(config.clone())),
            config,
        }
    }

    /// Default config with the debug override route enabled.
    pub fn for_tests() -> Self {
        Self::new(EngineConfig {
            debug_overrides: true,
            ..EngineConfig::default()
        })
    }
}
