//! ETag helpers for conditional reads of a game view.
//!
//! The store version grows by one on every state replacement, so a
//! `(game, version)` pair identifies one exact state.

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Generate an ETag for a game resource.
///
/// Format: `"game-{id}-v{version}"` (with quotes, as required by HTTP spec)
///
/// # Example
/// ```
/// # use werewolf_backend::http::etag::game_etag;
/// let etag = game_etag("abc", 5);
/// assert_eq!(etag, r#""game-abc-v5""#);
/// ```
pub fn game_etag(id: &str, version: u64) -> String {
    format!(r#""game-{id}-v{version}""#)
}

/// Parse the store version from a game ETag value.
///
/// # Errors
/// `AppError::bad_request` with `ErrorCode::InvalidHeader` when the version
/// marker is missing or not an integer.
pub fn parse_game_version_from_etag(s: &str) -> Result<u64, AppError> {
    let s = s.trim().trim_start_matches("W/").trim_matches('"');

    let version_prefix = "-v";
    let version_start = s.rfind(version_prefix).ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: missing version marker, got: \"{s}\""),
        )
    })? + version_prefix.len();

    let version_str = &s[version_start..];
    version_str.parse::<u64>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: version must be a valid integer, got: \"{version_str}\""),
        )
    })
}

/// True when an `If-None-Match` header value names `etag` (or is `*`).
pub fn if_none_match_hits(header: &str, etag: &str) -> bool {
    header
        .split(',')
        .map(|candidate| candidate.trim().trim_start_matches("W/"))
        .any(|candidate| candidate == "*" || candidate == etag)
}
