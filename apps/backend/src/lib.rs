#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod test_support;
pub mod trace_ctx;

// Re-exports for public API
pub use ai::{DecisionService, RandomPlayer};
pub use config::EngineConfig;
pub use domain::{apply, GameEvent, GameState};
pub use error::AppError;
pub use errors::ErrorCode;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use services::game_flow::{FlowOutcome, GameFlowService};
pub use services::games::GameRegistry;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
