use actix_web::http::StatusCode;
use actix_web::{test, web, HttpResponse};
use werewolf_backend::error::AppError;
use werewolf_backend::errors::ErrorCode;
use werewolf_backend::state::app_state::AppState;
use werewolf_backend::test_support::create_test_app_builder;

use crate::common::assert_problem;

async fn failing_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::invalid(ErrorCode::InvalidSetup, "Example failure"))
}

#[actix_web::test]
async fn error_body_and_headers_share_the_request_trace_id() {
    let app = create_test_app_builder(AppState::for_tests())
        .with_routes(|cfg| {
            cfg.route("/_test/error", web::get().to(failing_handler));
        })
        .build()
        .await;

    let req = test::TestRequest::get().uri("/_test/error").to_request();
    let resp = test::call_service(&app, req).await;

    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header")
        .to_string();

    let problem = assert_problem(resp, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SETUP").await;
    assert_eq!(problem.detail, "Example failure");
    assert_eq!(problem.title, "Invalid Setup");
    assert_eq!(problem.trace_id, request_id);
}

#[actix_web::test]
async fn unknown_game_is_a_problem_404() {
    let app = create_test_app_builder(AppState::for_tests()).build().await;

    let req = test::TestRequest::get()
        .uri("/api/games/missing/view")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let problem = assert_problem(resp, StatusCode::NOT_FOUND, "GAME_NOT_FOUND").await;
    assert!(problem.detail.contains("missing"));
}
