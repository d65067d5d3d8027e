//! Error handling for the werewolf backend.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, RejectKind};
pub use error_code::ErrorCode;
