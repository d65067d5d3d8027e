use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::ai::AiError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, RejectKind};
use crate::errors::ErrorCode;
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::BadRequest { code, .. } => *code,
            AppError::Internal { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Conflict { code, .. } => *code,
        }
    }

    /// Helper method to extract error detail from any error variant
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::Forbidden { detail } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Internal { detail, .. } => detail.clone(),
            AppError::Config { detail } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            status: StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn internal(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Internal {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(detail) => AppError::invalid(ErrorCode::ValidationError, detail),
            DomainError::Rejected(kind, detail) => {
                let code = match kind {
                    RejectKind::OutOfTurn => ErrorCode::OutOfTurn,
                    RejectKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                    RejectKind::ActorDead => ErrorCode::ActorDead,
                    RejectKind::NotHumanSeat => ErrorCode::NotHumanSeat,
                    RejectKind::InvalidTarget => ErrorCode::InvalidTarget,
                    RejectKind::AbilityUsed => ErrorCode::AbilityUsed,
                    RejectKind::GameOver => ErrorCode::GameOver,
                };
                AppError::conflict(code, detail)
            }
            DomainError::IllegalTransition { from, to } => AppError::internal(
                ErrorCode::IllegalTransition,
                format!("illegal transition {from:?} -> {to:?}"),
            ),
            DomainError::Conflict(ConflictKind::Superseded, detail) => {
                AppError::conflict(ErrorCode::FlowSuperseded, detail)
            }
            DomainError::Conflict(ConflictKind::Other(_), detail) => {
                AppError::conflict(ErrorCode::Conflict, detail)
            }
            DomainError::NotFound(NotFoundKind::Game, detail) => {
                AppError::not_found(ErrorCode::GameNotFound, detail)
            }
            DomainError::NotFound(NotFoundKind::Seat, detail) => {
                AppError::not_found(ErrorCode::PlayerNotFound, detail)
            }
            DomainError::NotFound(NotFoundKind::Other(_), detail) => {
                AppError::not_found(ErrorCode::NotFound, detail)
            }
        }
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(ErrorCode::DecisionServiceError, format!("{err}"))
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str().to_string();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("https://werewolf.local/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
