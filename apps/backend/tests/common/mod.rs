#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::{assert_problem_details_from_parts, ProblemDetailsLike};
use serde_json::Value;

pub mod proptest_prelude;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Asserts the Problem Details contract on a service response and returns
/// the parsed body.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        None,
    )
}

/// Reads a JSON body, panicking with the raw text when it does not parse.
pub async fn read_json(resp: ServiceResponse<BoxBody>) -> Value {
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).expect("body should be UTF-8");
    serde_json::from_str(text).unwrap_or_else(|e| panic!("invalid JSON ({e}): {text}"))
}
