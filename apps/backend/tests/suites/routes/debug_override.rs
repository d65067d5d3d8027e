use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;
use werewolf_backend::config::EngineConfig;
use werewolf_backend::state::app_state::AppState;
use werewolf_backend::test_support::create_test_app_builder;

use crate::common::{assert_problem, read_json};
use crate::support::http::{post_json, started_pinned_game};

const GAME: &str = "debug-game";

fn override_uri() -> String {
    format!("/api/games/{GAME}/debug/override")
}

#[actix_web::test]
async fn override_is_forbidden_unless_enabled() {
    let state = AppState::new(EngineConfig::default());
    let service = started_pinned_game(&state, GAME).await;
    let epoch = service.epoch();
    let app = create_test_app_builder(state).build().await;

    let resp = test::call_service(&app, post_json(&override_uri(), json!({ "phase": "DAY_VOTE" }))).await;

    assert_problem(resp, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    // Refused before touching the game.
    assert_eq!(service.epoch(), epoch);
}

#[actix_web::test]
async fn phase_jump_hard_resets_and_drives() {
    let state = AppState::for_tests();
    let service = started_pinned_game(&state, GAME).await;
    let epoch = service.epoch();
    let app = create_test_app_builder(state).build().await;

    let resp = test::call_service(&app, post_json(&override_uri(), json!({ "phase": "DAY_VOTE" }))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["report"]["mode"], "HARD_RESET");
    assert_eq!(body["report"]["from"], "NIGHT_GUARD_ACTION");
    assert_eq!(body["report"]["to"], "DAY_VOTE");
    assert_eq!(body["report"]["non_canonical"], true);
    assert_eq!(body["status"]["status"], "AWAITING_HUMAN");
    assert_eq!(body["status"]["action"], "DAY_VOTE");
    assert_eq!(body["view"]["phase"], "DAY_VOTE");
    assert_eq!(service.epoch(), epoch + 1);
}

#[actix_web::test]
async fn same_phase_patch_is_a_soft_resume() {
    let state = AppState::for_tests();
    started_pinned_game(&state, GAME).await;
    let app = create_test_app_builder(state).build().await;

    let resp = test::call_service(
        &app,
        post_json(
            &override_uri(),
            json!({ "night_actions": { "last_guard_target": 3 } }),
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["report"]["mode"], "SOFT_RESUME");
    assert_eq!(body["report"]["non_canonical"], false);
    assert_eq!(body["status"]["action"], "GUARD_PROTECT");
    assert_eq!(body["view"]["last_guard_target"], 3);
}

#[actix_web::test]
async fn override_naming_a_missing_seat_is_not_found() {
    let state = AppState::for_tests();
    started_pinned_game(&state, GAME).await;
    let app = create_test_app_builder(state).build().await;

    let resp = test::call_service(
        &app,
        post_json(&override_uri(), json!({ "night_actions": { "wolf_target": 17 } })),
    )
    .await;

    assert_problem(resp, StatusCode::NOT_FOUND, "PLAYER_NOT_FOUND").await;
}
