//! Engine and server configuration loaded from environment variables.
//!
//! Unset variables fall back to defaults; a set but malformed value is a
//! configuration error.

use std::env;

use crate::ai::{by_name, RemoteDecisionService};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    // Server configuration
    pub host: String,
    pub port: u16,

    /// Decision service calls per autonomous turn before the random
    /// legal fallback.
    pub decision_attempts: u32,
    /// Registry name of the decision service.
    pub decision_service: String,
    pub decision_url: Option<String>,

    /// Enables `POST /api/games/{id}/debug/override`.
    pub debug_overrides: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            decision_attempts: 2,
            decision_service: "RandomPlayer".to_string(),
            decision_url: None,
            debug_overrides: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("BACKEND_HOST").unwrap_or(defaults.host);

        let port = match get("BACKEND_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            None => defaults.port,
        };

        let decision_attempts = match get("WEREWOLF_DECISION_ATTEMPTS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(AppError::config(format!(
                        "WEREWOLF_DECISION_ATTEMPTS must be a positive integer, got '{raw}'"
                    )))
                }
            },
            None => defaults.decision_attempts,
        };

        let decision_service = get("WEREWOLF_DECISION_SERVICE").unwrap_or(defaults.decision_service);
        if by_name(&decision_service).is_none() {
            return Err(AppError::config(format!(
                "WEREWOLF_DECISION_SERVICE '{decision_service}' is not a registered decision service"
            )));
        }

        let decision_url = get("WEREWOLF_DECISION_URL");
        if decision_service == RemoteDecisionService::NAME && decision_url.is_none() {
            return Err(AppError::config(
                "WEREWOLF_DECISION_URL must be set for the Remote decision service",
            ));
        }

        let debug_overrides = match get("WEREWOLF_DEBUG_OVERRIDES").as_deref() {
            None => defaults.debug_overrides,
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => {
                return Err(AppError::config(format!(
                    "WEREWOLF_DEBUG_OVERRIDES must be true or false, got '{other}'"
                )))
            }
        };

        Ok(Self {
            host,
            port,
            decision_attempts,
            decision_service,
            decision_url,
            debug_overrides,
        })
    }
}
