//! Problem Details assertions for error responses.
//!
//! Works on raw response parts so the engine's own error types never leak
//! into the contract being checked.

use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Mirror of the engine's `ProblemDetails` body.
#[derive(Debug, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Asserts the stable error contract and returns the parsed body:
/// - status matches
/// - `Content-Type: application/problem+json`
/// - `x-trace-id` header present and equal to the body `trace_id`
/// - `code` (and `detail` substring, when given) match
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body_str =
        std::str::from_utf8(body_bytes).expect("Response body should be valid UTF-8");
    let problem: ProblemDetailsLike = serde_json::from_str(body_str).unwrap_or_else(|e| {
        panic!("Failed to parse error body as ProblemDetails ({e}). Raw body: {body_str}")
    });

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert!(!trace_id_header.is_empty());
    assert_eq!(
        problem.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem.type_.ends_with(&format!("/errors/{expected_code}")),
        "type should name the error code, got {}",
        problem.type_
    );
    assert!(!problem.title.is_empty());

    if let Some(expected_detail) = expected_detail_contains {
        assert!(
            problem.detail.contains(expected_detail),
            "Expected detail to contain '{}', but got '{}'",
            expected_detail,
            problem.detail
        );
    }
    problem
}
