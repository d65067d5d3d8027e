use std::sync::Arc;

use werewolf_backend::config::EngineConfig;
use werewolf_backend::domain::phase::Phase;
use werewolf_backend::domain::rules::TableSetup;
use werewolf_backend::error::AppError;
use werewolf_backend::errors::ErrorCode;
use werewolf_backend::domain::{NightAction, PlayerAction};
use werewolf_backend::services::game_flow::FlowOutcome;
use werewolf_backend::services::games::GameRegistry;
use werewolf_backend::test_support::{GatedDecisions, ScriptPlan, ScriptedDecisions};

use crate::support::flow::{pinned_service, pinned_table};

#[tokio::test]
async fn create_registers_and_starts_a_game() {
    let registry = GameRegistry::new(EngineConfig::default());

    let (service, outcome) = registry
        .create(&TableSetup::standard(7, 2), Some(99))
        .await
        .unwrap();

    let state = service.snapshot().state;
    assert_ne!(state.phase, Phase::Lobby);
    assert_eq!(state.rng_seed, 99);
    assert_eq!(state.human_seat(), Some(2));
    assert_eq!(registry.len(), 1);
    assert!(!matches!(
        outcome,
        werewolf_backend::FlowOutcome::Idle | werewolf_backend::FlowOutcome::Superseded
    ));

    let found = registry.get(&state.game_id).unwrap();
    assert_eq!(found.game_id(), state.game_id);
}

#[tokio::test]
async fn same_seed_deals_the_same_roles() {
    let registry = GameRegistry::new(EngineConfig::default());
    let setup = TableSetup::standard(9, 0);

    let (a, _) = registry.create(&setup, Some(5)).await.unwrap();
    let (b, _) = registry.create(&setup, Some(5)).await.unwrap();

    let roles = |s: &werewolf_backend::GameFlowService| {
        s.snapshot()
            .state
            .players
            .iter()
            .map(|p| p.role)
            .collect::<Vec<_>>()
    };
    assert_ne!(a.game_id(), b.game_id());
    assert_eq!(roles(&a), roles(&b));
}

#[tokio::test]
async fn missing_game_is_not_found() {
    let registry = GameRegistry::new(EngineConfig::default());

    let err = match registry.get("nope") {
        Err(e) => e,
        Ok(_) => panic!("expected GAME_NOT_FOUND"),
    };

    assert!(matches!(err, AppError::NotFound { .. }));
    assert_eq!(err.code(), ErrorCode::GameNotFound);
}

#[tokio::test]
async fn invalid_setup_registers_nothing() {
    let registry = GameRegistry::new(EngineConfig::default());

    let err = match registry.create(&TableSetup::standard(6, 6), None).await {
        Err(e) => e,
        Ok(_) => panic!("human seat out of range must be refused"),
    };

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn remote_service_without_url_is_a_config_error() {
    let registry = GameRegistry::new(EngineConfig {
        decision_service: "Remote".into(),
        ..EngineConfig::default()
    });

    let err = match registry.create(&TableSetup::standard(6, 0), Some(1)).await {
        Err(e) => e,
        Ok(_) => panic!("remote without URL must be refused"),
    };

    assert!(matches!(err, AppError::Internal { .. }));
    assert_eq!(err.code(), ErrorCode::DecisionServiceError);
}

#[tokio::test]
async fn resume_supersedes_the_running_game_it_replaces() {
    let registry = GameRegistry::new(EngineConfig::default());
    let gated = Arc::new(GatedDecisions::new(Arc::new(ScriptedDecisions::new(
        ScriptPlan::default(),
    ))));
    let old = pinned_service("replaced-game", gated.clone());
    registry.insert(Arc::clone(&old));
    old.start().await.unwrap();

    let driver = {
        let old = Arc::clone(&old);
        tokio::spawn(async move {
            old.submit_action(
                5,
                PlayerAction::NightAction {
                    action: NightAction::Guard { target: None },
                },
            )
            .await
        })
    };
    // Wolf chat for seat 0 is parked on the decision call.
    gated.wait_entered().await;
    let epoch_before = old.epoch();
    let saved = old.snapshot().state.as_ref().clone();
    let version_before = old.snapshot().version;

    let (fresh, _) = registry.resume(saved).await.unwrap();

    assert_eq!(old.epoch(), epoch_before + 1);
    gated.release(8);
    let outcome = driver.await.unwrap().unwrap();
    assert_eq!(outcome, FlowOutcome::Superseded);
    assert_eq!(old.snapshot().version, version_before);

    let found = registry.get("replaced-game").unwrap();
    assert!(Arc::ptr_eq(&found, &fresh));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn resume_refuses_a_structurally_broken_snapshot() {
    let registry = GameRegistry::new(EngineConfig::default());
    let mut state = pinned_table("broken-snapshot");
    state.players[0].is_human = true;
    state.players[2].seat = 4;

    let err = match registry.resume(state).await {
        Err(e) => e,
        Ok(_) => panic!("two humans and a shifted seat must be refused"),
    };

    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert!(registry.is_empty());
}
